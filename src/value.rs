//! Dynamic values stored in the containers.
//!
//! - Scalars (`Null`, `Bool`, `Int`, `Float`, `String`) and date-times are plain data
//! - `Array` is a nested [`Entries`] store with value semantics
//! - `Object` and `Callable` are shared handles compared by identity
//! - `Resource` is an opaque handle compared by id

use crate::entries::Entries;
use crate::format::value_to_string;
use crate::object::ObjectRef;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Any value a container can hold
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Entries),
    DateTime(DateTime<FixedOffset>),
    Object(ObjectRef),
    Callable(Callable),
    Resource(Resource),
}

/// A shared function value
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    /// True when both handles point at the same function
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// An opaque handle to something outside the container, such as a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    id: u64,
    kind: String,
}

impl Resource {
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl Value {
    /// Short name of the runtime type, used in diagnostics
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::DateTime(_) => "DateTime".to_string(),
            Value::Object(object) => object.class_name().to_string(),
            Value::Callable(_) => "Closure".to_string(),
            Value::Resource(resource) => format!("resource ({})", resource.kind()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    }

    /// Numbers and numeric strings
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) | Value::Float(_) => true,
            Value::String(s) => numeric_str(s).is_some(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => numeric_str(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Array(entries) => !entries.is_empty(),
            _ => true,
        }
    }

    /// Coercive equality: numbers and numeric strings compare by value,
    /// booleans and null by truthiness, arrays key-wise and objects of the
    /// same class property-wise.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
                self.truthy() == other.truthy()
            }
            (Value::Object(a), Value::Object(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                if a.class_name() != b.class_name() {
                    return false;
                }
                let (left, right) = (a.properties(), b.properties());
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right.iter())
                        .all(|((na, va), (nb, vb))| na == nb && va.loose_eq(vb))
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.loose_eq(w)))
            }
            (Value::String(a), Value::String(b)) => match (numeric_str(a), numeric_str(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                compare_values(self, other) == Ordering::Equal
            }
            (Value::Int(_) | Value::Float(_), Value::String(s))
            | (Value::String(s), Value::Int(_) | Value::Float(_)) => {
                let number = if let Value::String(_) = self { other } else { self };
                match numeric_str(s) {
                    Some(parsed) => number.as_f64() == Some(parsed),
                    None => value_to_string(number) == *s,
                }
            }
            _ => self == other,
        }
    }
}

/// Strict equality: no coercion between types, identity for objects and callables
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Resource(a), Value::Resource(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_to_string(self))
    }
}

/// Parses a numeric string, allowing surrounding whitespace
pub(crate) fn numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// NaN sorts after every number and equal to itself
fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::DateTime(_) => 5,
        Value::Object(_) => 6,
        Value::Callable(_) => 7,
        Value::Resource(_) => 8,
    }
}

/// Three-way comparison used by sorting.
///
/// Incomparable pairs fall back to a fixed rank by kind, and NaN sorts after
/// every other number.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => cmp_f64(
            a.as_f64().unwrap_or_default(),
            b.as_f64().unwrap_or_default(),
        ),
        (Value::String(x), Value::String(y)) => match (numeric_str(x), numeric_str(y)) {
            (Some(p), Some(q)) => cmp_f64(p, q),
            _ => x.cmp(y),
        },
        (Value::Int(_) | Value::Float(_), Value::String(s)) => match numeric_str(s) {
            Some(n) => cmp_f64(a.as_f64().unwrap_or_default(), n),
            None => value_to_string(a).as_str().cmp(s.as_str()),
        },
        (Value::String(_), Value::Int(_) | Value::Float(_)) => compare_values(b, a).reverse(),
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            a.truthy().cmp(&b.truthy())
        }
        (Value::Array(x), Value::Array(y)) => {
            if x.len() != y.len() {
                return x.len().cmp(&y.len());
            }
            for (key, left) in x.iter() {
                match y.get(key) {
                    Some(right) => match compare_values(left, right) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    },
                    None => return Ordering::Greater,
                }
            }
            Ordering::Equal
        }
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return Ordering::Equal;
            }
            if x.class_name() != y.class_name() {
                return x.class_name().cmp(y.class_name());
            }
            for ((_, left), (_, right)) in x.properties().iter().zip(y.properties().iter()) {
                match compare_values(left, right) {
                    Ordering::Equal => continue,
                    unequal => return unequal,
                }
            }
            Ordering::Equal
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Resource(resource)
    }
}

impl From<Entries> for Value {
    fn from(entries: Entries) -> Self {
        Value::Array(entries)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Record;

    #[test]
    fn test_strict_equality_does_not_coerce() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = ObjectRef::new(Record::new("Foo").with_field("name", "x"));
        let b = ObjectRef::new(Record::new("Foo").with_field("name", "x"));

        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a.clone()), Value::from(b.clone()));
        assert!(Value::from(a).loose_eq(&Value::from(b)));
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert!(Value::Int(10).loose_eq(&Value::from("10")));
        assert!(Value::from("1e1").loose_eq(&Value::from("10")));
        assert!(Value::Null.loose_eq(&Value::Bool(false)));
        assert!(!Value::from("abc").loose_eq(&Value::Int(0)));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&Value::Int(2), &Value::Float(2.5)), Ordering::Less);
        assert_eq!(compare_values(&Value::from("10"), &Value::from("9")), Ordering::Greater);
        assert_eq!(compare_values(&Value::from("b"), &Value::from("a")), Ordering::Greater);
        assert_eq!(
            compare_values(&Value::Float(f64::NAN), &Value::Int(1)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Float(f64::NEG_INFINITY), &Value::Float(f64::NAN)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Float(f64::NAN), &Value::Float(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_numeric_strings() {
        assert!(Value::from(" 42 ").is_numeric());
        assert!(Value::from("-1.5e3").is_numeric());
        assert!(!Value::from("inf").is_numeric());
        assert!(!Value::from("").is_numeric());
    }
}
