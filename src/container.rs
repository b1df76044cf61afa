use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::value::Value;

/// Borrowing iterator over a container's `(key, value)` pairs
pub type ContainerIter<'a> = Box<dyn Iterator<Item = (Key, &'a Value)> + 'a>;

/// Keyed, ordered storage shared by every container.
///
/// `set` is the only way values get in: each container validates there and
/// stores nothing when validation fails. Iteration borrows the container, so it
/// is a live view that cannot observe a mutation.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, GenericArray, Key, Value};
///
/// let mut array = GenericArray::new();
/// array.set(None, Value::Int(1))?;
/// array.set(Some(Key::from("name")), Value::from("Ada"))?;
///
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.get(&Key::Int(0)), Some(&Value::Int(1)));
/// assert!(array.unset(&Key::from("name")).is_some());
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
pub trait Container {
    /// Returns the number of stored values
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value stored at `key`; `None` only when the key is absent
    fn get(&self, key: &Key) -> Option<&Value>;

    fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` at `key`, or appends it when no key is given
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the container's declared
    /// types reject the key or value.
    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError>;

    /// Removes and returns the value at `key`
    fn unset(&mut self, key: &Key) -> Option<Value>;

    fn clear(&mut self);

    fn iter(&self) -> ContainerIter<'_>;

    /// Copies the stored pairs out, in storage order
    fn to_array(&self) -> Entries {
        self.iter().map(|(key, value)| (key, value.clone())).collect()
    }

    /// Copies the stored values out, in storage order
    fn values(&self) -> Vec<Value> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Applies a function to every pair, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns any error returned by the provided function.
    fn apply<F>(&self, mut f: F) -> Result<(), CollectionError>
    where
        Self: Sized,
        F: FnMut(&Key, &Value) -> Result<(), CollectionError>,
    {
        for (key, value) in self.iter() {
            f(&key, value)?;
        }
        Ok(())
    }
}

/// Builds the standard "must be of type" rejection for `value`
pub(crate) fn type_error(what: &str, expected: &impl std::fmt::Display, value: &Value) -> CollectionError {
    tracing::debug!(expected = %expected, value = %value, "{} rejected by type check", what);
    CollectionError::InvalidArgument(format!(
        "{what} must be of type {expected}; {} is {value}",
        what.to_lowercase()
    ))
}
