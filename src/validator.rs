//! Field Validation
//!
//! Validators check a single (already translated) field value. A
//! [`CompositeFieldValidator`] runs a fixed list in order and reports only the
//! first failure.

use crate::error::ValidationError;
use crate::messages::Messages;
use crate::translator::Translator;
use crate::types::{Field, FieldValue};
use tracing::trace;

mod constraint;
mod source;

pub use constraint::{ConstraintValidator, ValidatorKind};
pub use source::FieldValidatorSource;

/// Checks one field value. `None` means the field was left blank.
pub trait FieldValidator: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this validator rejects a blank value
    fn is_required(&self) -> bool {
        false
    }

    fn validate(&self, value: Option<&FieldValue>) -> Result<(), ValidationError>;
}

/// Ordered, fixed-at-construction list of validators; fails fast.
pub struct CompositeFieldValidator {
    validators: Vec<Box<dyn FieldValidator>>,
}

impl CompositeFieldValidator {
    pub fn new(validators: Vec<Box<dyn FieldValidator>>) -> Self {
        Self { validators }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }
}

impl FieldValidator for CompositeFieldValidator {
    fn name(&self) -> &str {
        "composite"
    }

    fn is_required(&self) -> bool {
        self.validators.iter().any(|v| v.is_required())
    }

    fn validate(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        for validator in &self.validators {
            trace!(validator = validator.name(), "Running field validator");
            validator.validate(value)?;
        }
        Ok(())
    }
}

/// Translate raw client input for `field`, then validate it.
///
/// Blank input becomes `None` and is never handed to the translator.
pub fn process_input(
    field: &Field,
    client_value: &str,
    translator: &dyn Translator,
    validator: &dyn FieldValidator,
    messages: &dyn Messages,
) -> Result<Option<FieldValue>, ValidationError> {
    let value = if client_value.trim().is_empty() {
        None
    } else {
        Some(translator.parse_client(field, client_value, messages)?)
    };
    validator.validate(value.as_ref())?;
    Ok(value)
}
