//! Core value types shared by translators, validators, and event handlers.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Runtime type identifier, e.g. `i32`, `integer`, `string`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        TypeTag(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::new(name)
    }
}

/// Declared supertypes per type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    supertypes: HashMap<TypeTag, Vec<TypeTag>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitive types and their abstract groupings.
    pub fn builtin() -> Self {
        let mut hierarchy = Self::new();
        hierarchy.declare("object", &[]);
        hierarchy.declare("string", &["object"]);
        hierarchy.declare("boolean", &["object"]);
        hierarchy.declare("bool", &["boolean"]);
        hierarchy.declare("number", &["object"]);
        hierarchy.declare("integer", &["number"]);
        for int in ["i8", "i16", "i32", "i64", "u8", "u16", "u32"] {
            hierarchy.declare(int, &["integer"]);
        }
        hierarchy.declare("float", &["number"]);
        hierarchy.declare("f32", &["float"]);
        hierarchy.declare("f64", &["float"]);
        hierarchy
    }

    /// Declare (or redeclare) the direct supertypes of `type_name`.
    pub fn declare(&mut self, type_name: &str, supertypes: &[&str]) {
        self.supertypes.insert(
            TypeTag::new(type_name),
            supertypes.iter().map(|s| TypeTag::new(*s)).collect(),
        );
    }

    /// Every declared type, sorted by name.
    pub fn types(&self) -> Vec<&TypeTag> {
        let mut types: Vec<&TypeTag> = self.supertypes.keys().collect();
        types.sort();
        types
    }

    pub fn supertypes(&self, tag: &TypeTag) -> &[TypeTag] {
        self.supertypes.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `tag` followed by every ancestor, breadth first, each direct
    /// supertype list visited in declaration order.
    pub fn lineage(&self, tag: &TypeTag) -> Vec<TypeTag> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = VecDeque::from([tag.clone()]);
        while let Some(next) = pending.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            pending.extend(self.supertypes(&next).iter().cloned());
            out.push(next);
        }
        out
    }
}

/// Typed form field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            FieldValue::Text(_) => TypeTag::new("string"),
            FieldValue::Integer(_) => TypeTag::new("i64"),
            FieldValue::Float(_) => TypeTag::new("f64"),
            FieldValue::Boolean(_) => TypeTag::new("bool"),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by range validators
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The form field a value belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value_type: TypeTag,
}

impl Field {
    pub fn new(label: impl Into<String>, value_type: impl Into<TypeTag>) -> Self {
        Self {
            label: label.into(),
            value_type: value_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_is_breadth_first() {
        let hierarchy = TypeHierarchy::builtin();
        let lineage: Vec<String> = hierarchy
            .lineage(&TypeTag::new("i32"))
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(lineage, vec!["i32", "integer", "number", "object"]);
    }

    #[test]
    fn test_lineage_handles_diamonds_and_unknowns() {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.declare("money", &["decimal", "comparable"]);
        hierarchy.declare("decimal", &["object"]);
        hierarchy.declare("comparable", &["object"]);
        let lineage = hierarchy.lineage(&TypeTag::new("money"));
        assert_eq!(
            lineage,
            vec![
                TypeTag::new("money"),
                TypeTag::new("decimal"),
                TypeTag::new("comparable"),
                TypeTag::new("object"),
            ]
        );
        assert_eq!(hierarchy.lineage(&TypeTag::new("x")), vec![TypeTag::new("x")]);
    }

    #[test]
    fn test_field_value_tags() {
        assert_eq!(FieldValue::Integer(3).type_tag().as_str(), "i64");
        assert_eq!(FieldValue::Text("a".into()).to_string(), "a");
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
    }
}
