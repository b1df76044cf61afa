//! Typed collections: an ordered store whose every element satisfies one
//! declared type.
//!
//! [`TypedCollection`] is generic over its [`Membership`] rule, which decides
//! whether a value that passed the type check may join. [`Collection`] admits
//! everything, [`Set`](crate::Set) refuses values it already holds.

use crate::container::{type_error, Container, ContainerIter};
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::extract::extract_for;
use crate::snapshot::{declared, ContainerKind, DeclaredType, Restorable};
use crate::types::TypeDescriptor;
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;

/// Decides whether a type-checked value may be stored
pub trait Membership:
    fmt::Debug + Clone + Copy + Default + PartialEq + Send + Sync + 'static
{
    const KIND: ContainerKind;

    /// Called after the type check and before anything is stored
    fn admits(entries: &Entries, value: &Value) -> bool;
}

/// Admits every value that passes the type check
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plain;

impl Membership for Plain {
    const KIND: ContainerKind = ContainerKind::Collection;

    fn admits(_entries: &Entries, _value: &Value) -> bool {
        true
    }
}

/// An ordered store of values of one declared type
#[derive(Debug, Clone, PartialEq)]
pub struct TypedCollection<M: Membership = Plain> {
    element_type: TypeDescriptor,
    entries: Entries,
    membership: PhantomData<M>,
}

/// A typed collection that accepts duplicates
///
/// # Examples
///
/// ```
/// use sovran_collections::{Collection, Container, Value};
///
/// let mut numbers = Collection::with_values("int", [3, 1, 2])?;
/// assert!(numbers.add(4)?);
/// assert!(numbers.add("five").is_err());
///
/// assert_eq!(numbers.len(), 4);
/// assert_eq!(numbers.first()?, &Value::Int(3));
/// assert!(numbers.contains(&Value::Int(2)));
/// assert!(numbers.contains_loosely(&Value::from("2")));
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
pub type Collection = TypedCollection<Plain>;

impl<M: Membership> TypedCollection<M> {
    /// Creates an empty collection of `element_type`
    pub fn new(element_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            element_type: element_type.into(),
            entries: Entries::new(),
            membership: PhantomData,
        }
    }

    /// Creates a collection holding `values`, each appended in order
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first value that does
    /// not match `element_type`.
    pub fn with_values<I>(
        element_type: impl Into<TypeDescriptor>,
        values: I,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut collection = Self::new(element_type);
        for value in values {
            collection.store(None, value.into())?;
        }
        Ok(collection)
    }

    /// Creates a collection holding `entries`, each set at its own key
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first value that does
    /// not match `element_type`.
    pub fn with_entries<I, K, V>(
        element_type: impl Into<TypeDescriptor>,
        entries: I,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut collection = Self::new(element_type);
        for (key, value) in entries {
            collection.store(Some(key.into()), value.into())?;
        }
        Ok(collection)
    }

    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element_type
    }

    /// Appends `value`, returning whether it was stored
    ///
    /// A [`Set`](crate::Set) returns `false` for a value it already holds.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the value does not match
    /// the element type; the collection is left unchanged.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<bool, CollectionError> {
        self.store(None, value.into())
    }

    /// Whether a strictly equal value is stored
    pub fn contains(&self, value: &Value) -> bool {
        self.entries.values().any(|stored| stored == value)
    }

    /// Whether a loosely equal value is stored
    pub fn contains_loosely(&self, value: &Value) -> bool {
        self.entries.values().any(|stored| stored.loose_eq(value))
    }

    /// Removes the first strictly equal value, returning whether one was found
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.entries.find_key(|stored| stored == value).cloned() {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the collection is empty.
    pub fn first(&self) -> Result<&Value, CollectionError> {
        self.entries
            .first()
            .map(|(_, value)| value)
            .ok_or_else(|| CollectionError::empty("first element"))
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the collection is empty.
    pub fn last(&self) -> Result<&Value, CollectionError> {
        self.entries
            .last()
            .map(|(_, value)| value)
            .ok_or_else(|| CollectionError::empty("last element"))
    }

    /// Extracts the named property, method result or array key from every element
    ///
    /// # Errors
    ///
    /// - Returns `CollectionError::UnsupportedOperation` if the element type has
    ///   no members to extract
    /// - Returns `CollectionError::ValueExtraction` for the first element missing
    ///   the member
    pub fn column(&self, name: &str) -> Result<Vec<Value>, CollectionError> {
        self.extract_each(Some(name))
    }

    pub(crate) fn entries(&self) -> &Entries {
        &self.entries
    }

    /// The element itself, or its named member, for every element in order
    pub(crate) fn extract_each(&self, name: Option<&str>) -> Result<Vec<Value>, CollectionError> {
        self.entries
            .values()
            .map(|element| extract_for(&self.element_type, element, name))
            .collect()
    }

    /// An empty collection of the same kind declared with `element_type`
    pub(crate) fn derive(&self, element_type: TypeDescriptor) -> Self {
        Self::new(element_type)
    }

    pub(crate) fn with_raw_entries(&self, entries: Entries) -> Self {
        Self {
            element_type: self.element_type.clone(),
            entries,
            membership: PhantomData,
        }
    }

    /// The single insertion gate: type check, then membership
    pub(crate) fn store(&mut self, key: Option<Key>, value: Value) -> Result<bool, CollectionError> {
        if !self.element_type.matches(&value) {
            return Err(type_error("Value", &self.element_type, &value));
        }
        self.admit(key, value)
    }

    /// Stores an already type-checked value if the membership rule allows it
    pub(crate) fn admit(&mut self, key: Option<Key>, value: Value) -> Result<bool, CollectionError> {
        if !M::admits(&self.entries, &value) {
            return Ok(false);
        }
        match key {
            Some(key) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.push(value)?;
            }
        }
        Ok(true)
    }

    /// A collection of the same kind holding the admitted `values` at keys 0, 1, ...
    pub(crate) fn collect_admitted<I>(&self, element_type: TypeDescriptor, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut result = self.derive(element_type);
        let mut index = 0;
        for value in values {
            if M::admits(&result.entries, &value) {
                result.entries.insert(Key::Int(index), value);
                index += 1;
            }
        }
        result
    }
}

impl<M: Membership> Container for TypedCollection<M> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        self.store(key, value).map(|_| ())
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

impl<M: Membership> Restorable for TypedCollection<M> {
    const KIND: ContainerKind = M::KIND;

    fn declared_types(&self) -> Vec<DeclaredType> {
        vec![DeclaredType::new(self.element_type.clone())]
    }

    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        Self::with_entries(declared(&types, 0)?, entries)
    }
}
