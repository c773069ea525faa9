//! Built-in constraint validators.

use super::FieldValidator;
use crate::error::ValidationError;
use crate::types::FieldValue;
use regex::Regex;

/// The built-in validator kinds and their constraint values.
#[derive(Debug, Clone)]
pub enum ValidatorKind {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    /// Must match the whole value
    Regexp(Regex),
}

impl ValidatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValidatorKind::Required => "required",
            ValidatorKind::MinLength(_) => "minlength",
            ValidatorKind::MaxLength(_) => "maxlength",
            ValidatorKind::Min(_) => "min",
            ValidatorKind::Max(_) => "max",
            ValidatorKind::Regexp(_) => "regexp",
        }
    }

    /// Constraint as shown in messages
    pub fn constraint_text(&self) -> String {
        match self {
            ValidatorKind::Required => String::new(),
            ValidatorKind::MinLength(n) | ValidatorKind::MaxLength(n) => n.to_string(),
            ValidatorKind::Min(x) | ValidatorKind::Max(x) => x.to_string(),
            ValidatorKind::Regexp(re) => strip_anchors(re.as_str()).to_string(),
        }
    }

    fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            ValidatorKind::Required => match value {
                FieldValue::Text(s) => !s.trim().is_empty(),
                _ => true,
            },
            ValidatorKind::MinLength(n) => text_len(value) >= *n,
            ValidatorKind::MaxLength(n) => text_len(value) <= *n,
            ValidatorKind::Min(min) => numeric(value).is_some_and(|v| v >= *min),
            ValidatorKind::Max(max) => numeric(value).is_some_and(|v| v <= *max),
            ValidatorKind::Regexp(re) => re.is_match(&value.to_string()),
        }
    }
}

/// One validator kind bound to a field's preformatted failure message.
#[derive(Debug, Clone)]
pub struct ConstraintValidator {
    kind: ValidatorKind,
    message: String,
}

impl ConstraintValidator {
    pub fn new(kind: ValidatorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ValidatorKind {
        &self.kind
    }

    fn reject(&self) -> ValidationError {
        ValidationError::new(self.kind.name(), self.message.clone())
    }
}

impl FieldValidator for ConstraintValidator {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn is_required(&self) -> bool {
        matches!(self.kind, ValidatorKind::Required)
    }

    fn validate(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        match value {
            Some(value) if self.kind.accepts(value) => Ok(()),
            Some(_) => Err(self.reject()),
            None if self.is_required() => Err(self.reject()),
            // Blank optional fields skip constraint checks.
            None => Ok(()),
        }
    }
}

/// Compile `pattern` so it must match the entire value.
pub(super) fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

fn strip_anchors(anchored: &str) -> &str {
    anchored
        .strip_prefix("^(?:")
        .and_then(|s| s.strip_suffix(")$"))
        .unwrap_or(anchored)
}

fn text_len(value: &FieldValue) -> usize {
    match value {
        FieldValue::Text(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

fn numeric(value: &FieldValue) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_text().and_then(|s| s.trim().parse().ok()))
}
