use crate::container::{type_error, Container, ContainerIter};
use crate::entries::Key;
use crate::error::CollectionError;
use crate::snapshot::{declared, ContainerKind, DeclaredType, Restorable};
use crate::types::TypeDescriptor;
use crate::value::Value;
use std::collections::VecDeque;

/// A typed first-in, first-out queue
///
/// Elements keep the integer keys they were added under: after a `poll` the
/// head of the queue is no longer at key 0.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, Queue, Value};
///
/// let mut queue = Queue::with_values("string", ["a", "b"])?;
/// assert!(queue.offer("c"));
/// assert!(!queue.offer(1));
///
/// assert_eq!(queue.poll(), Some(Value::from("a")));
/// assert_eq!(queue.element()?, &Value::from("b"));
/// assert_eq!(queue.len(), 2);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
    queue_type: TypeDescriptor,
    items: VecDeque<Value>,
    head: i64,
}

impl Queue {
    pub fn new(queue_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            queue_type: queue_type.into(),
            items: VecDeque::new(),
            head: 0,
        }
    }

    /// Creates a queue holding `values`, the first of them at the head
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first value that does
    /// not match `queue_type`.
    pub fn with_values<I>(
        queue_type: impl Into<TypeDescriptor>,
        values: I,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut queue = Self::new(queue_type);
        for value in values {
            queue.add(value)?;
        }
        Ok(queue)
    }

    pub fn queue_type(&self) -> &TypeDescriptor {
        &self.queue_type
    }

    /// Adds `value` at the tail
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the value does not match
    /// the queue type.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<bool, CollectionError> {
        let value = value.into();
        self.check(&value)?;
        self.items.push_back(value);
        Ok(true)
    }

    /// Adds `value` at the tail, returning `false` instead of failing when the
    /// value does not match the queue type
    pub fn offer(&mut self, value: impl Into<Value>) -> bool {
        offered(self.add(value))
    }

    /// The head of the queue
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn element(&self) -> Result<&Value, CollectionError> {
        self.peek().ok_or_else(CollectionError::empty_queue)
    }

    /// The head of the queue, or `None` if it is empty
    pub fn peek(&self) -> Option<&Value> {
        self.items.front()
    }

    /// Removes and returns the head of the queue, or `None` if it is empty
    pub fn poll(&mut self) -> Option<Value> {
        let value = self.items.pop_front()?;
        self.head += 1;
        Some(value)
    }

    /// Removes and returns the head of the queue
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn remove(&mut self) -> Result<Value, CollectionError> {
        self.poll().ok_or_else(CollectionError::empty_queue)
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), CollectionError> {
        if self.queue_type.matches(value) {
            Ok(())
        } else {
            Err(type_error("Value", &self.queue_type, value))
        }
    }

    /// Adds an already checked value in front of the head
    pub(crate) fn push_front(&mut self, value: Value) {
        self.items.push_front(value);
        self.head -= 1;
    }

    pub(crate) fn pop_back(&mut self) -> Option<Value> {
        self.items.pop_back()
    }

    pub(crate) fn back(&self) -> Option<&Value> {
        self.items.back()
    }

    fn position(&self, key: &Key) -> Option<usize> {
        match key {
            Key::Int(i) => usize::try_from(i.checked_sub(self.head)?).ok(),
            Key::Str(_) => None,
        }
    }
}

/// Turns a rejected add into `false`
pub(crate) fn offered(result: Result<bool, CollectionError>) -> bool {
    match result {
        Ok(added) => added,
        Err(error) => {
            tracing::debug!(%error, "offer refused");
            false
        }
    }
}

impl Container for Queue {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.items.get(self.position(key)?)
    }

    /// Always adds at the tail; a queue has no positional writes
    fn set(&mut self, _key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        self.add(value).map(|_| ())
    }

    /// Removes the element at `key`; elements behind it move up one position
    fn unset(&mut self, key: &Key) -> Option<Value> {
        let position = self.position(key)?;
        self.items.remove(position)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
    }

    fn iter(&self) -> ContainerIter<'_> {
        let head = self.head;
        Box::new(
            self.items
                .iter()
                .zip(head..)
                .map(|(value, index)| (Key::Int(index), value)),
        )
    }
}

impl Restorable for Queue {
    const KIND: ContainerKind = ContainerKind::Queue;

    fn declared_types(&self) -> Vec<DeclaredType> {
        vec![DeclaredType::new(self.queue_type.clone())]
    }

    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        let head = match entries.first() {
            Some((Key::Int(first), _)) => *first,
            _ => 0,
        };
        let mut queue = Self::with_values(declared(&types, 0)?, entries.into_iter().map(|(_, v)| v))?;
        queue.head = head;
        Ok(queue)
    }
}
