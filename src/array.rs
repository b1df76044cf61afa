use crate::container::{Container, ContainerIter};
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::snapshot::{ContainerKind, DeclaredType, Restorable};
use crate::value::Value;

/// An untyped ordered array: any value, at any key
///
/// ```
/// use sovran_collections::{Container, GenericArray, Value};
///
/// let mut array = GenericArray::from_values([Value::Int(1), Value::from("two")]);
/// array.set(None, Value::Null)?;
/// assert_eq!(array.values(), vec![Value::Int(1), Value::from("two"), Value::Null]);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericArray {
    entries: Entries,
}

impl GenericArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            entries: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl Container for GenericArray {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        match key {
            Some(key) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.push(value)?;
            }
        }
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

impl Restorable for GenericArray {
    const KIND: ContainerKind = ContainerKind::Array;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_anything() -> Result<(), CollectionError> {
        let mut array = GenericArray::new();
        array.set(None, Value::Int(1))?;
        array.set(None, Value::from("foo"))?;
        array.set(Some(Key::from("flag")), Value::Bool(true))?;
        array.set(None, Value::Null)?;

        assert_eq!(array.len(), 4);
        assert_eq!(array.get(&Key::Int(2)), Some(&Value::Null));
        assert!(array.contains_key(&Key::from("flag")));
        Ok(())
    }

    #[test]
    fn test_append_never_overwrites() {
        let mut array = GenericArray::new();
        array.set(Some(Key::Int(i64::MAX)), Value::from("last")).unwrap();

        assert!(matches!(
            array.set(None, Value::from("next")),
            Err(CollectionError::InvalidArgument(_))
        ));
        assert_eq!(array.get(&Key::Int(i64::MAX)), Some(&Value::from("last")));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_unset_and_clear() {
        let mut array = GenericArray::from_values([1, 2, 3]);

        assert_eq!(array.unset(&Key::Int(1)), Some(Value::Int(2)));
        assert_eq!(array.unset(&Key::Int(1)), None);
        let keys: Vec<_> = array.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::Int(0), Key::Int(2)]);

        array.clear();
        assert!(array.is_empty());
    }

    #[test]
    fn test_apply_stops_at_first_error() {
        let array = GenericArray::from_values([1, 2, 3]);
        let mut seen = Vec::new();

        let result = array.apply(|_, value| {
            if *value == Value::Int(2) {
                return Err(CollectionError::InvalidArgument("stop".to_string()));
            }
            seen.push(value.clone());
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(seen, vec![Value::Int(1)]);
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<(), CollectionError> {
        let mut array = GenericArray::from_values([Value::Int(1), Value::from("two")]);
        array.set(Some(Key::from("nested")), Value::from(vec![1.5, 2.5]))?;

        let restored = GenericArray::restore(&array.snapshot()?, &Default::default())?;
        assert_eq!(restored, array);
        Ok(())
    }
}
