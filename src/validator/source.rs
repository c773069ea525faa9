//! Builds validators from textual specifications such as `required,minlength=3`.

use super::constraint::{anchored, ConstraintValidator, ValidatorKind};
use super::{CompositeFieldValidator, FieldValidator};
use crate::error::ConfigError;
use crate::messages::Messages;
use std::sync::Arc;
use tracing::debug;

/// Creates field validators, resolving failure messages from a message set.
///
/// A field may override a validator's message with the key
/// `<field-id>-<validator>-message`; otherwise the validator name is the key.
pub struct FieldValidatorSource {
    messages: Arc<dyn Messages>,
}

impl FieldValidatorSource {
    pub fn new(messages: Arc<dyn Messages>) -> Self {
        Self { messages }
    }

    /// Parse `spec` into a composite validator for the field.
    ///
    /// Terms are comma separated. `regexp=` consumes the rest of the spec so
    /// patterns may contain commas, which means it must be the last term.
    pub fn create_validators(
        &self,
        field_id: &str,
        label: &str,
        spec: &str,
    ) -> Result<CompositeFieldValidator, ConfigError> {
        let mut validators: Vec<Box<dyn FieldValidator>> = Vec::new();
        let mut rest = spec.trim();
        while !rest.is_empty() {
            let (term, remainder) = if rest.starts_with("regexp=") {
                (rest, "")
            } else {
                match rest.split_once(',') {
                    Some((term, remainder)) => (term.trim(), remainder.trim()),
                    None => (rest, ""),
                }
            };
            rest = remainder;
            if term.is_empty() {
                continue;
            }
            let kind = parse_term(term)?;
            let message = self.message_for(field_id, label, &kind);
            validators.push(Box::new(ConstraintValidator::new(kind, message)));
        }
        debug!(field_id, spec, count = validators.len(), "Created field validators");
        Ok(CompositeFieldValidator::new(validators))
    }

    fn message_for(&self, field_id: &str, label: &str, kind: &ValidatorKind) -> String {
        let override_key = format!("{}-{}-message", field_id, kind.name());
        let key = if self.messages.contains(&override_key) {
            override_key
        } else {
            kind.name().to_string()
        };
        self.messages
            .format(&key, &[label, kind.constraint_text().as_str()])
    }
}

fn parse_term(term: &str) -> Result<ValidatorKind, ConfigError> {
    let (name, constraint) = match term.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (term.trim(), None),
    };
    match name {
        "required" => match constraint {
            None => Ok(ValidatorKind::Required),
            Some(_) => Err(ConfigError::Invalid(
                "Validator 'required' does not take a constraint".to_string(),
            )),
        },
        "minlength" => Ok(ValidatorKind::MinLength(parse_constraint(name, constraint)?)),
        "maxlength" => Ok(ValidatorKind::MaxLength(parse_constraint(name, constraint)?)),
        "min" => Ok(ValidatorKind::Min(parse_constraint(name, constraint)?)),
        "max" => Ok(ValidatorKind::Max(parse_constraint(name, constraint)?)),
        "regexp" => {
            let pattern = require_constraint(name, constraint)?;
            anchored(pattern)
                .map(ValidatorKind::Regexp)
                .map_err(|e| ConfigError::Invalid(format!("Invalid regexp '{}': {}", pattern, e)))
        }
        other => Err(ConfigError::Invalid(format!(
            "Unknown validator '{}' (known: required, minlength, maxlength, min, max, regexp)",
            other
        ))),
    }
}

fn require_constraint<'a>(name: &str, constraint: Option<&'a str>) -> Result<&'a str, ConfigError> {
    constraint.filter(|v| !v.is_empty()).ok_or_else(|| {
        ConfigError::Invalid(format!("Validator '{}' requires a constraint value", name))
    })
}

fn parse_constraint<T: std::str::FromStr>(
    name: &str,
    constraint: Option<&str>,
) -> Result<T, ConfigError> {
    let raw = require_constraint(name, constraint)?;
    raw.parse().map_err(|_| {
        ConfigError::Invalid(format!("Invalid constraint '{}' for validator '{}'", raw, name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{validation_defaults, MapMessages};
    use crate::types::FieldValue;
    use std::collections::HashMap;

    fn source() -> FieldValidatorSource {
        FieldValidatorSource::new(Arc::new(validation_defaults()))
    }

    #[test]
    fn test_parses_spec_in_order() {
        let composite = source()
            .create_validators("name", "Name", "required, minlength=2,maxlength=5")
            .unwrap();
        assert_eq!(composite.names(), vec!["required", "minlength", "maxlength"]);
        assert!(composite.is_required());

        let err = composite
            .validate(Some(&FieldValue::Text("a".into())))
            .unwrap_err();
        assert_eq!(err.message, "You must provide at least 2 characters for Name.");
    }

    #[test]
    fn test_empty_spec_is_noop() {
        let composite = source().create_validators("x", "X", "  ").unwrap();
        assert!(composite.is_empty());
        assert!(composite.validate(None).is_ok());
    }

    #[test]
    fn test_regexp_may_contain_commas() {
        let composite = source()
            .create_validators("zip", "Zip", "required,regexp=\\d{3,5}")
            .unwrap();
        assert!(composite.validate(Some(&FieldValue::Text("1234".into()))).is_ok());
        let err = composite
            .validate(Some(&FieldValue::Text("12".into())))
            .unwrap_err();
        assert_eq!(err.message, "Zip does not match pattern '\\d{3,5}'.");
    }

    #[test]
    fn test_field_specific_message_override() {
        let mut props: HashMap<String, String> = HashMap::new();
        props.insert("required".into(), "generic".into());
        props.insert("email-required-message".into(), "We need your {0}!".into());
        let source = FieldValidatorSource::new(Arc::new(MapMessages::new("en", props)));
        let composite = source.create_validators("email", "Email", "required").unwrap();
        assert_eq!(composite.validate(None).unwrap_err().message, "We need your Email!");
    }

    #[test]
    fn test_bad_specs_rejected() {
        let source = source();
        assert!(source.create_validators("f", "F", "minlength").is_err());
        assert!(source.create_validators("f", "F", "min=abc").is_err());
        assert!(source.create_validators("f", "F", "required=1").is_err());
        assert!(source.create_validators("f", "F", "email").is_err());
        assert!(source.create_validators("f", "F", "regexp=(").is_err());
    }
}
