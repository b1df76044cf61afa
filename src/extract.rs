use crate::entries::Key;
use crate::error::CollectionError;
use crate::types::TypeDescriptor;
use crate::value::Value;

/// Resolves a named member of `element`.
///
/// Arrays are indexed by key. Objects answer with the property of that name,
/// or failing that with the result of the zero-argument method of that name.
///
/// # Errors
///
/// - Returns `CollectionError::ValueExtraction` if the element has no such member
/// - Returns `CollectionError::UnsupportedOperation` if the element is a scalar
///
/// ```
/// use sovran_collections::{extract, Record, Value};
///
/// let bar = Value::from(Record::new("Bar").with_field("name", "a").into_ref());
/// assert_eq!(extract(&bar, "name").unwrap(), Value::from("a"));
/// assert!(extract(&bar, "missing").is_err());
/// assert!(extract(&Value::Int(1), "name").is_err());
/// ```
pub fn extract(element: &Value, name: &str) -> Result<Value, CollectionError> {
    extract_member(element, name, &element.type_name())
}

/// Extraction on behalf of a collection: no name means the element itself,
/// and unsupported elements are reported against the collection's type.
pub(crate) fn extract_for(
    collection_type: &TypeDescriptor,
    element: &Value,
    name: Option<&str>,
) -> Result<Value, CollectionError> {
    match name {
        None => Ok(element.clone()),
        Some(name) if !collection_type.has_members() => {
            Err(unsupported(collection_type.name(), name))
        }
        Some(name) => extract_member(element, name, collection_type.name()),
    }
}

fn unsupported(owner: &str, name: &str) -> CollectionError {
    CollectionError::UnsupportedOperation(format!(
        "The collection type \"{owner}\" does not support extracting \"{name}\""
    ))
}

fn extract_member(element: &Value, name: &str, owner: &str) -> Result<Value, CollectionError> {
    match element {
        Value::Array(entries) => entries.get(&Key::parse(name)).cloned().ok_or_else(|| {
            CollectionError::ValueExtraction(format!(
                "Key or index \"{name}\" not found in collection elements"
            ))
        }),
        Value::Object(object) => object
            .property(name)
            .or_else(|| object.call(name))
            .ok_or_else(|| {
                CollectionError::ValueExtraction(format!(
                    "Method or property \"{name}\" not defined in {}",
                    object.class_name()
                ))
            }),
        Value::DateTime(_) | Value::Callable(_) => Err(CollectionError::ValueExtraction(format!(
            "Method or property \"{name}\" not defined in {}",
            element.type_name()
        ))),
        _ => Err(unsupported(owner, name)),
    }
}
