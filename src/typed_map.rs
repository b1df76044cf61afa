use crate::container::{type_error, Container, ContainerIter};
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::map::{require_key, MapInterface};
use crate::snapshot::{declared, ContainerKind, DeclaredType, Restorable};
use crate::types::TypeDescriptor;
use crate::value::Value;

/// A map whose keys all match one type and whose values all match another
///
/// `TypedMap` checks both halves of every pair before storing it. Keys are
/// checked as values, so an `int` key type accepts `Key::Int` and a `string`
/// key type accepts `Key::Str`.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, Key, MapInterface, TypedMap, Value};
///
/// let mut ages = TypedMap::new("string", "int");
/// ages.put(Key::from("Ada"), Value::Int(36))?;
///
/// // Wrong key type
/// assert!(ages.set(Some(Key::Int(5)), Value::Int(1)).is_err());
/// // Wrong value type
/// assert!(ages.put(Key::from("Bob"), Value::from("old")).is_err());
///
/// assert_eq!(ages.len(), 1);
/// assert_eq!(ages.keys(), vec![Key::from("Ada")]);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMap {
    key_type: TypeDescriptor,
    value_type: TypeDescriptor,
    entries: Entries,
}

impl TypedMap {
    /// Creates an empty map
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_collections::{TypeDescriptor, TypedMap};
    ///
    /// let map = TypedMap::new("integer", "Person");
    /// assert_eq!(map.key_type(), &TypeDescriptor::Int);
    /// assert_eq!(map.value_type(), &TypeDescriptor::parse("person"));
    /// ```
    pub fn new(key_type: impl Into<TypeDescriptor>, value_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            key_type: key_type.into(),
            value_type: value_type.into(),
            entries: Entries::new(),
        }
    }

    /// Creates a map holding `entries`
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first pair whose key
    /// or value does not match the declared types.
    pub fn with_entries<I, K, V>(
        key_type: impl Into<TypeDescriptor>,
        value_type: impl Into<TypeDescriptor>,
        entries: I,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut map = Self::new(key_type, value_type);
        for (key, value) in entries {
            map.set(Some(key.into()), value.into())?;
        }
        Ok(map)
    }

    pub fn key_type(&self) -> &TypeDescriptor {
        &self.key_type
    }

    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value_type
    }
}

impl Container for TypedMap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        let key = require_key(key, &value)?;
        let key_value = key.to_value();
        if !self.key_type.matches(&key_value) {
            return Err(type_error("Key", &self.key_type, &key_value));
        }
        if !self.value_type.matches(&value) {
            return Err(type_error("Value", &self.value_type, &value));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    fn unset(&mut self, key: &Key) -> Option<Value> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn iter(&self) -> ContainerIter<'_> {
        Box::new(self.entries.iter().map(|(key, value)| (key.clone(), value)))
    }

    fn to_array(&self) -> Entries {
        self.entries.clone()
    }
}

impl MapInterface for TypedMap {}

impl Restorable for TypedMap {
    const KIND: ContainerKind = ContainerKind::TypedMap;

    fn declared_types(&self) -> Vec<DeclaredType> {
        vec![
            DeclaredType::new(self.key_type.clone()),
            DeclaredType::new(self.value_type.clone()),
        ]
    }

    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        Self::with_entries(declared(&types, 0)?, declared(&types, 1)?, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Record;

    #[test]
    fn test_key_type_error() {
        let mut map = TypedMap::new("string", "int");

        match map.set(Some(Key::Int(5)), Value::Int(1)) {
            Err(CollectionError::InvalidArgument(message)) => {
                assert_eq!(message, "Key must be of type string; key is 5");
            }
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_value_type_error() {
        let mut map = TypedMap::new("int", "Person");

        match map.set(Some(Key::Int(1)), Value::from("Ada")) {
            Err(CollectionError::InvalidArgument(message)) => {
                assert_eq!(message, "Value must be of type Person; value is Ada");
            }
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
        assert!(map
            .set(Some(Key::Int(1)), Record::new("Person").into_ref().into())
            .is_ok());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = TypedMap::with_entries("string", "int", [("a", 1), ("b", 2)]).unwrap();
        map.put(Key::from("a"), Value::Int(3)).unwrap();

        assert_eq!(map.keys(), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(map.get(&Key::from("a")), Some(&Value::Int(3)));
    }

    #[test]
    fn test_put_if_absent_checks_types() {
        let mut map = TypedMap::new("string", "int");

        assert!(map.put_if_absent(Key::from("a"), Value::from("x")).is_err());
        assert_eq!(map.put_if_absent(Key::from("a"), Value::Int(1)).unwrap(), None);
        assert_eq!(map.put_if_absent(Key::from("a"), Value::Int(2)).unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn test_replace_if_checks_types() {
        let mut map = TypedMap::with_entries("string", "int", [("a", 1)]).unwrap();

        assert!(map.replace_if(&Key::from("a"), &Value::Int(1), Value::Null).is_err());
        assert_eq!(map.get(&Key::from("a")), Some(&Value::Int(1)));
    }
}
