//! Key/value maps.
//!
//! Every map requires an explicit key on `set`. The operations of
//! [`MapInterface`] are built on [`Container`], so they pass through the same
//! key and value checks as a direct `set`.

use crate::container::{Container, ContainerIter};
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::snapshot::{ContainerKind, DeclaredType, Restorable};
use crate::value::Value;

/// Associative operations shared by all maps
///
/// # Examples
///
/// ```
/// use sovran_collections::{AssociativeArrayMap, Key, MapInterface, Value};
///
/// let mut map = AssociativeArrayMap::new();
/// assert_eq!(map.put(Key::from("a"), Value::Int(1))?, None);
/// assert_eq!(map.put(Key::from("a"), Value::Int(2))?, Some(Value::Int(1)));
///
/// assert_eq!(map.put_if_absent(Key::from("a"), Value::Int(3))?, Some(Value::Int(2)));
/// assert!(map.replace_if(&Key::from("a"), &Value::Int(2), Value::Int(4))?);
/// assert_eq!(map.get_or(&Key::from("b"), Value::from("none")), Value::from("none"));
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
pub trait MapInterface: Container {
    /// The value at `key`, or `default` when the key is absent
    fn get_or(&self, key: &Key, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Whether a strictly equal value is stored under any key
    fn contains_value(&self, value: &Value) -> bool {
        self.iter().any(|(_, stored)| stored == value)
    }

    fn keys(&self) -> Vec<Key> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Stores `value` at `key`, returning the value it replaced
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the map rejects the key or
    /// value; the map is left unchanged.
    fn put(&mut self, key: Key, value: Value) -> Result<Option<Value>, CollectionError> {
        let previous = self.get(&key).cloned();
        self.set(Some(key), value)?;
        Ok(previous)
    }

    /// Stores `value` only if `key` is absent or holds null, returning the
    /// value found at `key`
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the map rejects the key or
    /// value.
    fn put_if_absent(&mut self, key: Key, value: Value) -> Result<Option<Value>, CollectionError> {
        let current = self.get(&key).cloned();
        if matches!(current, None | Some(Value::Null)) {
            self.set(Some(key), value)?;
        }
        Ok(current)
    }

    /// Removes and returns the value at `key`
    fn remove(&mut self, key: &Key) -> Option<Value> {
        self.unset(key)
    }

    /// Removes `key` only if it holds a value strictly equal to `value`
    fn remove_if(&mut self, key: &Key, value: &Value) -> bool {
        if self.get(key) == Some(value) {
            self.unset(key);
            return true;
        }
        false
    }

    /// Stores `value` only if `key` is present, returning the value it replaced
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the map rejects the value.
    fn replace(&mut self, key: Key, value: Value) -> Result<Option<Value>, CollectionError> {
        if !self.contains_key(&key) {
            return Ok(None);
        }
        self.put(key, value)
    }

    /// Stores `new_value` only if `key` holds a value strictly equal to `old_value`
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the map rejects the value.
    fn replace_if(
        &mut self,
        key: &Key,
        old_value: &Value,
        new_value: Value,
    ) -> Result<bool, CollectionError> {
        if self.get(key) != Some(old_value) {
            return Ok(false);
        }
        self.set(Some(key.clone()), new_value)?;
        Ok(true)
    }
}

/// Unwraps the key of a map `set`
pub(crate) fn require_key(key: Option<Key>, value: &Value) -> Result<Key, CollectionError> {
    key.ok_or_else(|| {
        tracing::debug!(value = %value, "map set without a key");
        CollectionError::InvalidArgument(format!(
            "Map elements are key/value pairs; a key must be provided for value {value}"
        ))
    })
}

/// A map with keys and values of any type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociativeArrayMap {
    entries: Entries,
}

impl AssociativeArrayMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Container for AssociativeArrayMap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        let key = require_key(key, &value)?;
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

impl MapInterface for AssociativeArrayMap {}

impl Restorable for AssociativeArrayMap {
    const KIND: ContainerKind = ContainerKind::AssociativeArrayMap;

    fn declared_types(&self) -> Vec<DeclaredType> {
        Vec::new()
    }

    fn rebuild(
        _types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        Ok(Self::from_entries(entries))
    }
}
