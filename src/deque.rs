use crate::container::{Container, ContainerIter};
use crate::entries::Key;
use crate::error::CollectionError;
use crate::queue::{offered, Queue};
use crate::snapshot::{ContainerKind, DeclaredType, Restorable};
use crate::types::TypeDescriptor;
use crate::value::Value;

/// A typed queue that can be added to and removed from at both ends
///
/// The plain queue operations (`add`, `offer`, `element`, `peek`, `poll`,
/// `remove`) act on the tail for insertion and the head for removal, exactly
/// like [`Queue`].
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, DoubleEndedQueue, Value};
///
/// let mut deque = DoubleEndedQueue::with_values("string", ["x"])?;
/// deque.add_first("w")?;
/// assert_eq!(deque.values(), vec![Value::from("w"), Value::from("x")]);
///
/// assert_eq!(deque.remove_last()?, Value::from("x"));
/// assert_eq!(deque.values(), vec![Value::from("w")]);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleEndedQueue {
    queue: Queue,
}

impl DoubleEndedQueue {
    pub fn new(queue_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            queue: Queue::new(queue_type),
        }
    }

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
        Ok(Self {
            queue: Queue::with_values(queue_type, values)?,
        })
    }

    pub fn queue_type(&self) -> &TypeDescriptor {
        self.queue.queue_type()
    }

    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the value does not match
    /// the queue type.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<bool, CollectionError> {
        self.queue.add(value)
    }

    pub fn offer(&mut self, value: impl Into<Value>) -> bool {
        self.queue.offer(value)
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn element(&self) -> Result<&Value, CollectionError> {
        self.queue.element()
    }

    pub fn peek(&self) -> Option<&Value> {
        self.queue.peek()
    }

    pub fn poll(&mut self) -> Option<Value> {
        self.queue.poll()
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn remove(&mut self) -> Result<Value, CollectionError> {
        self.queue.remove()
    }

    /// Adds `value` in front of the head
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the value does not match
    /// the queue type.
    pub fn add_first(&mut self, value: impl Into<Value>) -> Result<bool, CollectionError> {
        let value = value.into();
        self.queue.check(&value)?;
        self.queue.push_front(value);
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the value does not match
    /// the queue type.
    pub fn add_last(&mut self, value: impl Into<Value>) -> Result<bool, CollectionError> {
        self.queue.add(value)
    }

    pub fn offer_first(&mut self, value: impl Into<Value>) -> bool {
        offered(self.add_first(value))
    }

    pub fn offer_last(&mut self, value: impl Into<Value>) -> bool {
        self.queue.offer(value)
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn remove_first(&mut self) -> Result<Value, CollectionError> {
        self.queue.remove()
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn remove_last(&mut self) -> Result<Value, CollectionError> {
        self.poll_last().ok_or_else(CollectionError::empty_queue)
    }

    pub fn poll_first(&mut self) -> Option<Value> {
        self.queue.poll()
    }

    pub fn poll_last(&mut self) -> Option<Value> {
        self.queue.pop_back()
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn first_element(&self) -> Result<&Value, CollectionError> {
        self.queue.element()
    }

    /// # Errors
    ///
    /// Returns `CollectionError::NoSuchElement` if the queue is empty.
    pub fn last_element(&self) -> Result<&Value, CollectionError> {
        self.peek_last().ok_or_else(CollectionError::empty_queue)
    }

    pub fn peek_first(&self) -> Option<&Value> {
        self.queue.peek()
    }

    pub fn peek_last(&self) -> Option<&Value> {
        self.queue.back()
    }
}

impl Container for DoubleEndedQueue {
    fn len(&self) -> usize {
        self.queue.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.queue.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        self.queue.set(key, value)
    }

    fn unset(&mut self, key: &Key) -> Option<Value> {
        self.queue.unset(key)
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn iter(&self) -> ContainerIter<'_> {
        self.queue.iter()
    }
}

impl Restorable for DoubleEndedQueue {
    const KIND: ContainerKind = ContainerKind::DoubleEndedQueue;

    fn declared_types(&self) -> Vec<DeclaredType> {
        self.queue.declared_types()
    }

    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        Ok(Self {
            queue: Queue::rebuild(types, entries)?,
        })
    }
}
