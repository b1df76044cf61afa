//! Non-mutating transforms over typed collections.
//!
//! Every operation here leaves the receiver untouched and returns a new
//! collection of the same kind.

use crate::collection::{Membership, TypedCollection};
use crate::container::Container;
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::types::TypeDescriptor;
use crate::value::{compare_values, Value};
use std::fmt;
use std::str::FromStr;

/// Direction of [`TypedCollection::sort`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(CollectionError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl<M: Membership> TypedCollection<M> {
    /// Returns a copy sorted by the elements, or by their named member
    ///
    /// The sort is stable, so elements that compare equal keep their relative
    /// order in either direction.
    ///
    /// # Errors
    ///
    /// Fails like [`TypedCollection::column`] when a name is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_collections::{Collection, Container, SortOrder, Value};
    ///
    /// let numbers = Collection::with_values("int", [3, 1, 2])?;
    /// let sorted = numbers.sort(None, SortOrder::Ascending)?;
    ///
    /// assert_eq!(sorted.values(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    /// assert_eq!(numbers.values(), vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    ///
    /// let order: SortOrder = "desc".parse()?;
    /// assert_eq!(numbers.sort(None, order)?.first()?, &Value::Int(3));
    /// # Ok::<(), sovran_collections::CollectionError>(())
    /// ```
    pub fn sort(&self, name: Option<&str>, order: SortOrder) -> Result<Self, CollectionError> {
        let mut keyed: Vec<(Value, &Value)> = self
            .extract_each(name)?
            .into_iter()
            .zip(self.entries().values())
            .collect();

        keyed.sort_by(|(a, _), (b, _)| match order {
            SortOrder::Ascending => compare_values(a, b),
            SortOrder::Descending => compare_values(a, b).reverse(),
        });

        Ok(self.reindexed(keyed.into_iter().map(|(_, value)| value.clone()), "sort"))
    }

    /// Returns a copy holding only the elements `predicate` accepts
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool,
    {
        let kept = self.entries().values().filter(|value| predicate(value)).cloned();
        self.reindexed(kept, "filter")
    }

    /// Returns a copy holding the elements, or elements whose named member,
    /// strictly equal to `value`
    ///
    /// # Errors
    ///
    /// Fails like [`TypedCollection::column`] when a name is given.
    pub fn where_eq(&self, name: Option<&str>, value: &Value) -> Result<Self, CollectionError> {
        let kept = self
            .extract_each(name)?
            .into_iter()
            .zip(self.entries().values())
            .filter(|(extracted, _)| extracted == value)
            .map(|(_, element)| element.clone())
            .collect::<Vec<_>>();
        Ok(self.reindexed(kept, "where"))
    }

    /// Applies `f` to every element, collecting the results into a `mixed`
    /// collection of the same kind
    ///
    /// ```
    /// use sovran_collections::{Collection, Container, TypeDescriptor, Value};
    ///
    /// let numbers = Collection::with_values("int", [1, 2])?;
    /// let labels = numbers.map(|n| Value::from(format!("#{n}")));
    ///
    /// assert_eq!(labels.element_type(), &TypeDescriptor::Mixed);
    /// assert_eq!(labels.values(), vec![Value::from("#1"), Value::from("#2")]);
    /// # Ok::<(), sovran_collections::CollectionError>(())
    /// ```
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        let mapped = self.collect_admitted(TypeDescriptor::Mixed, self.entries().values().map(f));
        self.traced("map", mapped)
    }

    /// Applies `f` to every element, collecting the results into a collection
    /// of the same kind declared with `element_type`
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first result that
    /// does not match `element_type`.
    pub fn map_into<F>(
        &self,
        element_type: impl Into<TypeDescriptor>,
        f: F,
    ) -> Result<Self, CollectionError>
    where
        F: FnMut(&Value) -> Value,
    {
        let mut mapped = self.derive(element_type.into());
        for value in self.entries().values().map(f) {
            mapped.store(None, value)?;
        }
        Ok(self.traced("map", mapped))
    }

    /// Folds the elements in storage order, starting from `initial`
    pub fn reduce<T, F>(&self, initial: T, f: F) -> T
    where
        F: FnMut(T, &Value) -> T,
    {
        self.entries().values().fold(initial, f)
    }

    /// Returns the elements held by exactly one of the two collections: first
    /// the receiver's, then the other's
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::CollectionMismatch` if `other` holds a
    /// different element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_collections::{Collection, Container, Value};
    ///
    /// let a = Collection::with_values("int", [1, 2, 3])?;
    /// let b = Collection::with_values("int", [2, 3, 4])?;
    ///
    /// assert_eq!(a.diff(&b)?.values(), vec![Value::Int(1), Value::Int(4)]);
    /// assert_eq!(a.intersect(&b)?.values(), vec![Value::Int(2), Value::Int(3)]);
    /// assert!(a.diff(&Collection::new("string")).is_err());
    /// # Ok::<(), sovran_collections::CollectionError>(())
    /// ```
    pub fn diff(&self, other: &Self) -> Result<Self, CollectionError> {
        self.check_same_type(other, None)?;

        let ours = self.entries().values().filter(|value| !other.contains(value));
        let theirs = other.entries().values().filter(|value| !self.contains(value));
        let kept = ours.chain(theirs).cloned().collect::<Vec<_>>();
        Ok(self.reindexed(kept, "diff"))
    }

    /// Returns the receiver's elements that `other` also holds, at their
    /// original keys
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::CollectionMismatch` if `other` holds a
    /// different element type.
    pub fn intersect(&self, other: &Self) -> Result<Self, CollectionError> {
        self.check_same_type(other, None)?;

        let kept: Entries = self
            .entries()
            .iter()
            .filter(|(_, value)| other.contains(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(self.traced("intersect", self.with_raw_entries(kept)))
    }

    /// Returns the receiver followed by every collection in `others`
    ///
    /// Integer keys are appended; string keys overwrite an earlier value at the
    /// same key. A [`Set`](crate::Set) drops merged values it already holds.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::CollectionMismatch` naming the position in
    /// `others` of the first collection holding a different element type.
    /// Returns `CollectionError::InvalidArgument` if an appended value finds
    /// its index already taken.
    pub fn merge(&self, others: &[&Self]) -> Result<Self, CollectionError> {
        for (index, other) in others.iter().enumerate() {
            self.check_same_type(other, Some(index))?;
        }

        let mut merged = self.clone();
        for other in others {
            for (key, value) in other.entries().iter() {
                let key = match key {
                    Key::Int(_) => None,
                    Key::Str(_) => Some(key.clone()),
                };
                merged.admit(key, value.clone())?;
            }
        }
        Ok(self.traced("merge", merged))
    }

    /// Returns a copy keeping the first element of every distinct value, or
    /// of every distinct named member
    ///
    /// # Errors
    ///
    /// Fails like [`TypedCollection::column`] when a name is given.
    pub fn unique(&self, name: Option<&str>) -> Result<Self, CollectionError> {
        let mut seen: Vec<Value> = Vec::new();
        let mut kept = Vec::new();
        for (extracted, element) in self.extract_each(name)?.into_iter().zip(self.entries().values()) {
            if !seen.contains(&extracted) {
                seen.push(extracted);
                kept.push(element.clone());
            }
        }
        Ok(self.reindexed(kept, "unique"))
    }

    fn check_same_type(&self, other: &Self, index: Option<usize>) -> Result<(), CollectionError> {
        if other.element_type() == self.element_type() {
            return Ok(());
        }
        let message = match index {
            Some(index) => format!(
                "Collection items in collection with index {index} must be of type {}",
                self.element_type()
            ),
            None => format!("Collection items must be of type {}", self.element_type()),
        };
        tracing::debug!(expected = %self.element_type(), found = %other.element_type(), "collection type mismatch");
        Err(CollectionError::CollectionMismatch(message))
    }

    /// A collection of the same type holding `values` at keys 0, 1, ...
    fn reindexed<I>(&self, values: I, operation: &str) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let result = self.collect_admitted(self.element_type().clone(), values);
        self.traced(operation, result)
    }

    fn traced(&self, operation: &str, result: Self) -> Self {
        tracing::trace!(
            operation,
            input = self.len(),
            output = result.len(),
            "collection transformed"
        );
        result
    }
}
