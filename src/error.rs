use thiserror::Error;

/// Errors that can occur when using the typed containers
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A value, key or parameter violates the declared type of a container
    #[error("{0}")]
    InvalidArgument(String),
    /// An operation that needs an element was invoked on an empty container
    #[error("{0}")]
    NoSuchElement(String),
    /// A named property, method or array key does not exist on an element
    #[error("{0}")]
    ValueExtraction(String),
    /// A property or method based operation was invoked on scalar elements
    #[error("{0}")]
    UnsupportedOperation(String),
    /// The operand of diff, intersect or merge holds a different element type
    #[error("{0}")]
    CollectionMismatch(String),
    /// The sort order token is neither ascending nor descending
    #[error("Invalid sort order given: {0}")]
    InvalidSortOrder(String),
    /// A snapshot blob could not be read or written
    #[error("Malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl CollectionError {
    pub(crate) fn empty(what: &str) -> Self {
        CollectionError::NoSuchElement(format!("Can't determine {what}. Collection is empty"))
    }

    pub(crate) fn empty_queue() -> Self {
        CollectionError::NoSuchElement(
            "Can't return element from Queue. Queue is empty.".to_string(),
        )
    }
}
