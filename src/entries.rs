//! The ordered key/value store that backs every container.

use crate::error::CollectionError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;

/// A position or name inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// The key viewed as a value, used when a key has to pass a type check
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(i) => Value::Int(*i),
            Key::Str(s) => Value::String(s.clone()),
        }
    }

    /// Parses an array index the way a lookup by name would see it:
    /// decimal integers become `Int`, anything else stays a string.
    pub fn parse(name: &str) -> Self {
        match name.parse::<i64>() {
            Ok(i) if i.to_string() == name => Key::Int(i),
            _ => Key::Str(name.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

/// Insertion-ordered mapping from [`Key`] to [`Value`].
///
/// Overwriting a key keeps its original position. Appending uses the next
/// integer index, one past the largest integer key ever stored; removing
/// entries never lowers it, only [`Entries::clear`] does.
#[derive(Clone, Default)]
pub struct Entries {
    slots: BTreeMap<u64, (Key, Value)>,
    positions: HashMap<Key, u64>,
    next_slot: u64,
    next_index: i64,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        let slot = self.positions.get(key)?;
        self.slots.get(slot).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.positions.contains_key(key)
    }

    /// Stores `value` at `key`, returning the value it replaced
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Key::Int(i) = key {
            if i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }

        if let Some(slot) = self.positions.get(&key) {
            if let Some(entry) = self.slots.get_mut(slot) {
                return Some(std::mem::replace(&mut entry.1, value));
            }
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.positions.insert(key.clone(), slot);
        self.slots.insert(slot, (key, value));
        None
    }

    /// Appends `value` at the next integer index and returns that index
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` when the next index is
    /// already occupied, which only happens once `i64::MAX` has been used.
    pub fn push(&mut self, value: Value) -> Result<Key, CollectionError> {
        let key = Key::Int(self.next_index);
        if self.contains_key(&key) {
            tracing::debug!(index = self.next_index, "append refused, index in use");
            return Err(CollectionError::InvalidArgument(format!(
                "Cannot add element at index {}. The next element is already occupied",
                self.next_index
            )));
        }
        self.insert(key.clone(), value);
        Ok(key)
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let slot = self.positions.remove(key)?;
        self.slots.remove(&slot).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn first(&self) -> Option<(&Key, &Value)> {
        self.slots.first_key_value().map(|(_, (k, v))| (k, v))
    }

    pub fn last(&self) -> Option<(&Key, &Value)> {
        self.slots.last_key_value().map(|(_, (k, v))| (k, v))
    }

    /// Key of the first entry whose value satisfies `predicate`
    pub fn find_key<F>(&self, mut predicate: F) -> Option<&Key>
    where
        F: FnMut(&Value) -> bool,
    {
        self.iter().find(|(_, v)| predicate(v)).map(|(k, _)| k)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.slots.values(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Key> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.slots.into_values().map(|(_, v)| v).collect()
    }
}

/// Borrowing iterator over an [`Entries`] store in storage order
pub struct Iter<'a> {
    inner: btree_map::Values<'a, u64, (Key, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Entries {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Entries {
    type Item = (Key, Value);
    type IntoIter = btree_map::IntoValues<u64, (Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_values()
    }
}

impl FromIterator<(Key, Value)> for Entries {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut entries = Entries::new();
        for (key, value) in iter {
            entries.insert(key, value);
        }
        entries
    }
}

impl FromIterator<Value> for Entries {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        (0..).zip(iter).map(|(i, value)| (Key::Int(i), value)).collect()
    }
}

/// Two stores are equal when they hold strictly equal pairs in the same order
impl PartialEq for Entries {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl fmt::Debug for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_follows_largest_int_key() {
        let mut entries = Entries::new();
        entries.insert(Key::Int(5), Value::Int(1));
        assert_eq!(entries.push(Value::Int(2)).unwrap(), Key::Int(6));

        entries.remove(&Key::Int(6));
        assert_eq!(entries.push(Value::Int(3)).unwrap(), Key::Int(7));

        entries.clear();
        assert_eq!(entries.push(Value::Int(4)).unwrap(), Key::Int(0));
    }

    #[test]
    fn test_push_refuses_occupied_max_index() {
        let mut entries = Entries::new();
        entries.insert(Key::Int(i64::MAX), Value::Int(1));

        let result = entries.push(Value::Int(2));
        assert!(matches!(result, Err(CollectionError::InvalidArgument(_))));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&Key::Int(i64::MAX)), Some(&Value::Int(1)));

        // Once the last index is free again it can take exactly one more value
        entries.remove(&Key::Int(i64::MAX));
        assert_eq!(entries.push(Value::Int(3)).unwrap(), Key::Int(i64::MAX));
        assert!(entries.push(Value::Int(4)).is_err());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut entries = Entries::new();
        entries.insert("a".into(), Value::Int(1));
        entries.insert("b".into(), Value::Int(2));
        let previous = entries.insert("a".into(), Value::Int(3));

        assert_eq!(previous, Some(Value::Int(1)));
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(entries.get(&"a".into()), Some(&Value::Int(3)));
    }

    #[test]
    fn test_null_is_present() {
        let mut entries = Entries::new();
        entries.insert("gone".into(), Value::Null);

        assert!(entries.contains_key(&"gone".into()));
        assert_eq!(entries.get(&"gone".into()), Some(&Value::Null));
        assert_eq!(entries.get(&"missing".into()), None);
    }

    #[test]
    fn test_first_last_and_find() {
        let entries: Entries = vec![Value::Int(1), Value::Int(2), Value::Int(3)]
            .into_iter()
            .collect();

        assert_eq!(entries.first().map(|(_, v)| v), Some(&Value::Int(1)));
        assert_eq!(entries.last().map(|(_, v)| v), Some(&Value::Int(3)));
        assert_eq!(entries.find_key(|v| *v == Value::Int(2)), Some(&Key::Int(1)));
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("12"), Key::Int(12));
        assert_eq!(Key::parse("012"), Key::Str("012".to_string()));
        assert_eq!(Key::parse("name"), Key::Str("name".to_string()));
    }
}
