//! Snapshot and restore of containers.
//!
//! A snapshot is a JSON document holding the container kind, its declared
//! types and its key/value pairs. Restoring re-validates every pair through the
//! container's own type gate. Objects are only rebuilt when their class is
//! registered in an [`ObjectRegistry`] and is a class the container declares
//! (or the container accepts any object), so a blob cannot smuggle arbitrary
//! classes into a container.

use crate::container::Container;
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::object::{same_type_name, ObjectRef, Record};
use crate::types::TypeDescriptor;
use crate::value::Value;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The concrete container a snapshot was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Array,
    Collection,
    Set,
    Queue,
    DoubleEndedQueue,
    AssociativeArrayMap,
    TypedMap,
    NamedParameterMap,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Array => "array",
            ContainerKind::Collection => "collection",
            ContainerKind::Set => "set",
            ContainerKind::Queue => "queue",
            ContainerKind::DoubleEndedQueue => "double-ended queue",
            ContainerKind::AssociativeArrayMap => "associative array map",
            ContainerKind::TypedMap => "typed map",
            ContainerKind::NamedParameterMap => "named parameter map",
        };
        f.write_str(name)
    }
}

/// A declared type, bound to a parameter name for named parameter maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub descriptor: TypeDescriptor,
}

impl DeclaredType {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            name: None,
            descriptor,
        }
    }

    pub fn named(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: Some(name.into()),
            descriptor,
        }
    }
}

/// Returns the descriptor declared at `position`
pub(crate) fn declared(
    types: &[DeclaredType],
    position: usize,
) -> Result<TypeDescriptor, CollectionError> {
    types
        .get(position)
        .map(|declared| declared.descriptor.clone())
        .ok_or_else(|| {
            CollectionError::InvalidArgument(format!(
                "Snapshot declares {} type(s); type {} is missing",
                types.len(),
                position + 1
            ))
        })
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    kind: ContainerKind,
    types: Vec<DeclaredType>,
    entries: Vec<(Key, Captured)>,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum Captured {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    NonFinite(NonFinite),
    String(String),
    Array(Vec<(Key, Captured)>),
    DateTime(String),
    Object {
        class: String,
        properties: Vec<(String, Captured)>,
    },
}

// JSON has no NaN or infinity, so they travel as tokens
#[derive(Serialize, Deserialize)]
enum NonFinite {
    #[serde(rename = "NAN")]
    Nan,
    #[serde(rename = "INF")]
    Infinity,
    #[serde(rename = "-INF")]
    NegInfinity,
}

fn capture(value: &Value) -> Result<Captured, CollectionError> {
    Ok(match value {
        Value::Null => Captured::Null,
        Value::Bool(b) => Captured::Bool(*b),
        Value::Int(i) => Captured::Int(*i),
        Value::Float(f) if f.is_nan() => Captured::NonFinite(NonFinite::Nan),
        Value::Float(f) if f.is_infinite() => Captured::NonFinite(if *f > 0.0 {
            NonFinite::Infinity
        } else {
            NonFinite::NegInfinity
        }),
        Value::Float(f) => Captured::Float(*f),
        Value::String(s) => Captured::String(s.clone()),
        Value::Array(entries) => Captured::Array(
            entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), capture(value)?)))
                .collect::<Result<_, CollectionError>>()?,
        ),
        Value::DateTime(dt) => {
            Captured::DateTime(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
        }
        Value::Object(object) => Captured::Object {
            class: object.class_name().to_string(),
            properties: object
                .properties()
                .iter()
                .map(|(name, value)| Ok((name.clone(), capture(value)?)))
                .collect::<Result<_, CollectionError>>()?,
        },
        Value::Callable(_) => {
            return Err(CollectionError::InvalidArgument(
                "Serialization of 'Closure' is not allowed".to_string(),
            ))
        }
        Value::Resource(resource) => {
            return Err(CollectionError::InvalidArgument(format!(
                "Serialization of {} resources is not allowed",
                resource.kind()
            )))
        }
    })
}

fn revive(
    captured: Captured,
    registry: &ObjectRegistry,
    types: &[DeclaredType],
) -> Result<Value, CollectionError> {
    Ok(match captured {
        Captured::Null => Value::Null,
        Captured::Bool(b) => Value::Bool(b),
        Captured::Int(i) => Value::Int(i),
        Captured::Float(f) => Value::Float(f),
        Captured::NonFinite(NonFinite::Nan) => Value::Float(f64::NAN),
        Captured::NonFinite(NonFinite::Infinity) => Value::Float(f64::INFINITY),
        Captured::NonFinite(NonFinite::NegInfinity) => Value::Float(f64::NEG_INFINITY),
        Captured::String(s) => Value::String(s),
        Captured::Array(pairs) => Value::Array(
            pairs
                .into_iter()
                .map(|(key, value)| Ok((key, revive(value, registry, types)?)))
                .collect::<Result<Entries, CollectionError>>()?,
        ),
        Captured::DateTime(text) => {
            let dt = DateTime::parse_from_rfc3339(&text).map_err(|e| {
                CollectionError::InvalidArgument(format!("Invalid date-time \"{text}\": {e}"))
            })?;
            Value::DateTime(dt)
        }
        Captured::Object { class, properties } => {
            let declared = types.iter().any(|declared| match &declared.descriptor {
                TypeDescriptor::Class(name) => same_type_name(name, &class),
                TypeDescriptor::Object | TypeDescriptor::Mixed => true,
                _ => false,
            });
            if !declared {
                return Err(CollectionError::InvalidArgument(format!(
                    "Snapshot holds an object of class {class}, which the container does not declare"
                )));
            }
            let properties = properties
                .into_iter()
                .map(|(name, value)| Ok((name, revive(value, registry, types)?)))
                .collect::<Result<Vec<_>, CollectionError>>()?;
            Value::Object(registry.revive(&class, properties)?)
        }
    })
}

type Reviver = Arc<dyn Fn(Vec<(String, Value)>) -> Result<ObjectRef, CollectionError> + Send + Sync>;

/// The classes a restore is allowed to rebuild, and how to rebuild them
///
/// ```
/// use sovran_collections::{Collection, ObjectRegistry, Record, Restorable};
///
/// let people = Collection::with_values(
///     "Person",
///     [Record::new("Person").with_field("name", "Ada").into_ref()],
/// )?;
///
/// let mut registry = ObjectRegistry::new();
/// registry.register_record("Person");
///
/// let restored = Collection::restore(&people.snapshot()?, &registry)?;
/// assert_eq!(restored.column("name")?, people.column("name")?);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Clone, Default)]
pub struct ObjectRegistry {
    revivers: HashMap<String, Reviver>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function that rebuilds objects of `class` from their properties
    pub fn register<F>(&mut self, class: &str, reviver: F) -> &mut Self
    where
        F: Fn(Vec<(String, Value)>) -> Result<ObjectRef, CollectionError> + Send + Sync + 'static,
    {
        self.revivers.insert(registry_key(class), Arc::new(reviver));
        self
    }

    /// Registers `class` to be rebuilt as a [`Record`] carrying the captured fields
    pub fn register_record(&mut self, class: &str) -> &mut Self {
        let class_name = class.to_string();
        self.register(class, move |properties| {
            let record = properties
                .into_iter()
                .fold(Record::new(class_name.clone()), |record, (name, value)| {
                    record.with_field(name, value)
                });
            Ok(record.into_ref())
        })
    }

    pub fn contains(&self, class: &str) -> bool {
        self.revivers.contains_key(&registry_key(class))
    }

    fn revive(
        &self,
        class: &str,
        properties: Vec<(String, Value)>,
    ) -> Result<ObjectRef, CollectionError> {
        let reviver = self.revivers.get(&registry_key(class)).ok_or_else(|| {
            CollectionError::InvalidArgument(format!(
                "Class {class} is not registered for restoring"
            ))
        })?;
        reviver(properties)
    }
}

fn registry_key(class: &str) -> String {
    class.trim_start_matches('\\').to_ascii_lowercase()
}

/// Containers that can be captured to a snapshot and rebuilt from one
pub trait Restorable: Container + Sized {
    const KIND: ContainerKind;

    /// The types this container was declared with
    fn declared_types(&self) -> Vec<DeclaredType>;

    /// Rebuilds a container, sending every pair through its type gate
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if a pair no longer matches the
    /// declared types.
    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError>;

    /// Captures the container as a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` if the container holds a
    /// callable or a resource.
    fn snapshot(&self) -> Result<String, CollectionError> {
        let entries = self
            .iter()
            .map(|(key, value)| Ok((key, capture(value)?)))
            .collect::<Result<Vec<_>, CollectionError>>()?;
        let snapshot = Snapshot {
            kind: Self::KIND,
            types: self.declared_types(),
            entries,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuilds a container from a snapshot taken of the same kind
    ///
    /// # Errors
    ///
    /// - Returns `CollectionError::Snapshot` if the blob is not a valid snapshot
    /// - Returns `CollectionError::InvalidArgument` if the snapshot is of another
    ///   kind, holds an object the registry or the container does not allow, or
    ///   holds a value the declared types reject
    fn restore(blob: &str, registry: &ObjectRegistry) -> Result<Self, CollectionError> {
        let Snapshot {
            kind,
            types,
            entries,
        } = serde_json::from_str(blob)?;

        if kind != Self::KIND {
            return Err(CollectionError::InvalidArgument(format!(
                "Cannot restore a {kind} snapshot as a {}",
                Self::KIND
            )));
        }

        let entries = entries
            .into_iter()
            .map(|(key, captured)| Ok((key, revive(captured, registry, &types)?)))
            .collect::<Result<Vec<_>, CollectionError>>()?;
        Self::rebuild(types, entries)
    }
}
