//! Runtime type descriptors and the check that matches values against them.

use crate::object::same_type_name;
use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DATE_TIME_TYPES: [&str; 3] = ["DateTime", "DateTimeImmutable", "DateTimeInterface"];

/// The declared type of a container's elements, keys or values.
///
/// Parsing accepts the usual aliases (`integer`, `double`, `boolean`); any
/// other name is taken to be a class or interface name.
///
/// ```
/// use sovran_collections::{TypeDescriptor, Value};
///
/// let int = TypeDescriptor::parse("integer");
/// assert_eq!(int, TypeDescriptor::Int);
/// assert!(int.matches(&Value::Int(3)));
/// assert!(!int.matches(&Value::Float(3.0)));
/// ```
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Array,
    Bool,
    Callable,
    Float,
    Int,
    Null,
    Numeric,
    Object,
    Resource,
    Scalar,
    String,
    Mixed,
    /// A class or interface name
    Class(String),
}

impl TypeDescriptor {
    pub fn parse(name: &str) -> Self {
        match name {
            "array" => TypeDescriptor::Array,
            "bool" | "boolean" => TypeDescriptor::Bool,
            "callable" => TypeDescriptor::Callable,
            "float" | "double" => TypeDescriptor::Float,
            "int" | "integer" => TypeDescriptor::Int,
            "null" => TypeDescriptor::Null,
            "numeric" => TypeDescriptor::Numeric,
            "object" => TypeDescriptor::Object,
            "resource" => TypeDescriptor::Resource,
            "scalar" => TypeDescriptor::Scalar,
            "string" => TypeDescriptor::String,
            "mixed" => TypeDescriptor::Mixed,
            other => TypeDescriptor::Class(other.to_string()),
        }
    }

    /// Checks whether `value` satisfies this type. Never fails.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeDescriptor::Array => matches!(value, Value::Array(_)),
            TypeDescriptor::Bool => matches!(value, Value::Bool(_)),
            TypeDescriptor::Callable => matches!(value, Value::Callable(_)),
            TypeDescriptor::Float => matches!(value, Value::Float(_)),
            TypeDescriptor::Int => matches!(value, Value::Int(_)),
            TypeDescriptor::Null => matches!(value, Value::Null),
            TypeDescriptor::Numeric => value.is_numeric(),
            TypeDescriptor::Object => matches!(
                value,
                Value::Object(_) | Value::DateTime(_) | Value::Callable(_)
            ),
            TypeDescriptor::Resource => matches!(value, Value::Resource(_)),
            TypeDescriptor::Scalar => value.is_scalar(),
            TypeDescriptor::String => matches!(value, Value::String(_)),
            TypeDescriptor::Mixed => true,
            TypeDescriptor::Class(name) => match value {
                Value::Object(object) => object.is_instance_of(name),
                Value::DateTime(_) => DATE_TIME_TYPES.iter().any(|t| same_type_name(t, name)),
                Value::Callable(_) => same_type_name("Closure", name),
                _ => false,
            },
        }
    }

    /// Whether values of this type can have named members to extract
    pub fn has_members(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Array
                | TypeDescriptor::Object
                | TypeDescriptor::Mixed
                | TypeDescriptor::Class(_)
        )
    }

    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Array => "array",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Callable => "callable",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Int => "int",
            TypeDescriptor::Null => "null",
            TypeDescriptor::Numeric => "numeric",
            TypeDescriptor::Object => "object",
            TypeDescriptor::Resource => "resource",
            TypeDescriptor::Scalar => "scalar",
            TypeDescriptor::String => "string",
            TypeDescriptor::Mixed => "mixed",
            TypeDescriptor::Class(name) => name,
        }
    }
}

/// Aliases compare equal after parsing; class names compare case-insensitively
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDescriptor::Class(a), TypeDescriptor::Class(b)) => same_type_name(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for TypeDescriptor {
    fn from(name: &str) -> Self {
        TypeDescriptor::parse(name)
    }
}

impl From<String> for TypeDescriptor {
    fn from(name: String) -> Self {
        TypeDescriptor::parse(&name)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TypeDescriptor::parse(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Record;
    use crate::value::{Callable, Resource};
    use chrono::DateTime;
    use rstest::rstest;

    fn sample(kind: &str) -> Value {
        match kind {
            "array" => Value::from(vec![1, 2]),
            "bool" => Value::Bool(true),
            "callable" => Value::Callable(Callable::new("noop", |_| Value::Null)),
            "float" => Value::Float(1.5),
            "int" => Value::Int(3),
            "null" => Value::Null,
            "numeric string" => Value::from("12.5"),
            "object" => Value::Object(Record::new("Foo").into_ref()),
            "resource" => Value::Resource(Resource::new(1, "stream")),
            "string" => Value::from("foo"),
            _ => unreachable!("unknown sample {kind}"),
        }
    }

    #[rstest]
    #[case("array", "array", true)]
    #[case("array", "int", false)]
    #[case("bool", "bool", true)]
    #[case("boolean", "bool", true)]
    #[case("bool", "int", false)]
    #[case("callable", "callable", true)]
    #[case("callable", "string", false)]
    #[case("float", "float", true)]
    #[case("double", "float", true)]
    #[case("float", "int", false)]
    #[case("int", "int", true)]
    #[case("integer", "int", true)]
    #[case("int", "numeric string", false)]
    #[case("null", "null", true)]
    #[case("null", "bool", false)]
    #[case("numeric", "int", true)]
    #[case("numeric", "float", true)]
    #[case("numeric", "numeric string", true)]
    #[case("numeric", "string", false)]
    #[case("object", "object", true)]
    #[case("object", "callable", true)]
    #[case("object", "array", false)]
    #[case("resource", "resource", true)]
    #[case("resource", "int", false)]
    #[case("scalar", "string", true)]
    #[case("scalar", "bool", true)]
    #[case("scalar", "null", false)]
    #[case("scalar", "array", false)]
    #[case("string", "string", true)]
    #[case("string", "int", false)]
    #[case("mixed", "null", true)]
    #[case("mixed", "object", true)]
    #[case("Foo", "object", true)]
    #[case("foo", "object", true)]
    #[case("Bar", "object", false)]
    #[case("Foo", "string", false)]
    fn test_matches(#[case] descriptor: &str, #[case] kind: &str, #[case] expected: bool) {
        let descriptor = TypeDescriptor::parse(descriptor);
        assert_eq!(descriptor.matches(&sample(kind)), expected);
    }

    #[test]
    fn test_date_time_is_an_object() {
        let value = Value::DateTime(
            DateTime::parse_from_rfc3339("2024-02-12T15:19:21+00:00").unwrap(),
        );

        assert!(TypeDescriptor::Object.matches(&value));
        assert!(TypeDescriptor::parse("DateTimeInterface").matches(&value));
        assert!(!TypeDescriptor::String.matches(&value));
    }

    #[rstest]
    #[case("Foo", true)]
    #[case("array", true)]
    #[case("mixed", true)]
    #[case("int", false)]
    #[case("string", false)]
    #[case("callable", false)]
    fn test_has_members(#[case] descriptor: &str, #[case] expected: bool) {
        assert_eq!(TypeDescriptor::parse(descriptor).has_members(), expected);
    }

    #[test]
    fn test_aliases_compare_equal() {
        assert_eq!(TypeDescriptor::parse("integer"), TypeDescriptor::parse("int"));
        assert_eq!(TypeDescriptor::parse("Foo"), TypeDescriptor::parse("\\foo"));
        assert_ne!(TypeDescriptor::parse("Foo"), TypeDescriptor::parse("Bar"));
        assert_eq!(TypeDescriptor::parse("double").to_string(), "float");
    }
}
