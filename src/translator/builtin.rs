//! Built-in translators for the primitive field types.

use super::Translator;
use crate::error::ValidationError;
use crate::messages::Messages;
use crate::types::{Field, FieldValue, TypeTag};
use std::sync::Arc;

pub(super) fn all() -> Vec<Arc<dyn Translator>> {
    let translators: [Arc<dyn Translator>; 4] = [
        Arc::new(StringTranslator),
        Arc::new(IntegerTranslator),
        Arc::new(FloatTranslator),
        Arc::new(BooleanTranslator),
    ];
    translators.into()
}

/// Passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTranslator;

impl Translator for StringTranslator {
    fn name(&self) -> &str {
        "string"
    }

    fn value_type(&self) -> TypeTag {
        TypeTag::new("string")
    }

    fn message_key(&self) -> &str {
        "required"
    }

    fn to_client(&self, value: &FieldValue) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        _field: &Field,
        client_value: &str,
        _messages: &dyn Messages,
    ) -> Result<FieldValue, ValidationError> {
        Ok(FieldValue::Text(client_value.to_string()))
    }
}

/// Whole numbers, range-checked against the field's declared width.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTranslator;

impl IntegerTranslator {
    fn bounds(value_type: &TypeTag) -> (i64, i64) {
        match value_type.as_str() {
            "i8" => (i8::MIN as i64, i8::MAX as i64),
            "i16" => (i16::MIN as i64, i16::MAX as i64),
            "i32" => (i32::MIN as i64, i32::MAX as i64),
            "u8" => (0, u8::MAX as i64),
            "u16" => (0, u16::MAX as i64),
            "u32" => (0, u32::MAX as i64),
            _ => (i64::MIN, i64::MAX),
        }
    }
}

impl Translator for IntegerTranslator {
    fn name(&self) -> &str {
        "integer"
    }

    fn value_type(&self) -> TypeTag {
        TypeTag::new("integer")
    }

    fn message_key(&self) -> &str {
        "integer-format-exception"
    }

    fn to_client(&self, value: &FieldValue) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        field: &Field,
        client_value: &str,
        messages: &dyn Messages,
    ) -> Result<FieldValue, ValidationError> {
        let parsed: i64 = client_value.trim().parse().map_err(|_| {
            ValidationError::new(
                self.name(),
                messages.format(self.message_key(), &[field.label.as_str()]),
            )
        })?;
        let (min, max) = Self::bounds(&field.value_type);
        if parsed < min || parsed > max {
            return Err(ValidationError::new(
                self.name(),
                messages.format(
                    "integer-range-exception",
                    &[field.label.as_str(), min.to_string().as_str(), max.to_string().as_str()],
                ),
            ));
        }
        Ok(FieldValue::Integer(parsed))
    }
}

/// Finite decimal numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatTranslator;

impl Translator for FloatTranslator {
    fn name(&self) -> &str {
        "float"
    }

    fn value_type(&self) -> TypeTag {
        TypeTag::new("float")
    }

    fn message_key(&self) -> &str {
        "number-format-exception"
    }

    fn to_client(&self, value: &FieldValue) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        field: &Field,
        client_value: &str,
        messages: &dyn Messages,
    ) -> Result<FieldValue, ValidationError> {
        let reject = || {
            ValidationError::new(
                self.name(),
                messages.format(self.message_key(), &[field.label.as_str()]),
            )
        };
        let parsed: f64 = client_value.trim().parse().map_err(|_| reject())?;
        let in_range = match field.value_type.as_str() {
            "f32" => parsed.abs() <= f32::MAX as f64,
            _ => true,
        };
        if !parsed.is_finite() || !in_range {
            return Err(reject());
        }
        Ok(FieldValue::Float(parsed))
    }
}

/// `true/false`, `yes/no`, `on/off`, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTranslator;

impl Translator for BooleanTranslator {
    fn name(&self) -> &str {
        "boolean"
    }

    fn value_type(&self) -> TypeTag {
        TypeTag::new("boolean")
    }

    fn message_key(&self) -> &str {
        "boolean-format-exception"
    }

    fn to_client(&self, value: &FieldValue) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        field: &Field,
        client_value: &str,
        messages: &dyn Messages,
    ) -> Result<FieldValue, ValidationError> {
        match client_value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(FieldValue::Boolean(true)),
            "false" | "no" | "off" => Ok(FieldValue::Boolean(false)),
            _ => Err(ValidationError::new(
                self.name(),
                messages.format(self.message_key(), &[field.label.as_str()]),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::validation_defaults;

    #[test]
    fn test_integer_format_error_uses_message_key() {
        let messages = validation_defaults();
        let err = IntegerTranslator
            .parse_client(&Field::new("Count", "integer"), "12a", &messages)
            .unwrap_err();
        assert_eq!(err.validator, "integer");
        assert_eq!(err.message, "You must provide an integer value for Count.");
    }

    #[test]
    fn test_integer_bounds_follow_field_type() {
        let messages = validation_defaults();
        let field = Field::new("Delta", "i8");
        assert!(IntegerTranslator.parse_client(&field, "-128", &messages).is_ok());
        assert!(IntegerTranslator.parse_client(&field, "128", &messages).is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let messages = validation_defaults();
        let field = Field::new("Ratio", "f64");
        assert_eq!(
            FloatTranslator.parse_client(&field, "2.5", &messages).unwrap(),
            FieldValue::Float(2.5)
        );
        assert!(FloatTranslator.parse_client(&field, "NaN", &messages).is_err());
        assert!(FloatTranslator
            .parse_client(&Field::new("Ratio", "f32"), "1e300", &messages)
            .is_err());
    }

    #[test]
    fn test_boolean_spellings() {
        let messages = validation_defaults();
        let field = Field::new("Agree", "bool");
        assert_eq!(
            BooleanTranslator.parse_client(&field, "Yes", &messages).unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            BooleanTranslator.parse_client(&field, "off", &messages).unwrap(),
            FieldValue::Boolean(false)
        );
        let err = BooleanTranslator.parse_client(&field, "maybe", &messages).unwrap_err();
        assert_eq!(err.message, "You must provide true or false for Agree.");
    }

    #[test]
    fn test_to_client() {
        assert_eq!(IntegerTranslator.to_client(&FieldValue::Integer(-7)), "-7");
        assert_eq!(StringTranslator.to_client(&FieldValue::Text("x".into())), "x");
    }
}
