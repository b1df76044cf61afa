use crate::container::{Container, ContainerIter};
use crate::entries::{Entries, Key};
use crate::error::CollectionError;
use crate::map::{require_key, MapInterface};
use crate::snapshot::{ContainerKind, DeclaredType, Restorable};
use crate::types::TypeDescriptor;
use crate::value::Value;

/// A map over a fixed set of parameter names, each with its own type
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, Key, MapInterface, NamedParameterMap, Value};
///
/// let mut options = NamedParameterMap::new([("port", "int"), ("host", "string")])
///     .with_untyped(["extra"]);
///
/// options.put(Key::from("port"), Value::Int(8080))?;
/// options.put(Key::from("extra"), Value::from(vec![1, 2]))?;
///
/// assert!(options.put(Key::from("port"), Value::from("http")).is_err());
/// assert!(options.put(Key::from("user"), Value::from("ada")).is_err());
/// assert_eq!(options.len(), 2);
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameterMap {
    parameters: Vec<(String, TypeDescriptor)>,
    entries: Entries,
}

impl NamedParameterMap {
    /// Creates an empty map accepting exactly the given parameters
    pub fn new<I, N, T>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<TypeDescriptor>,
    {
        let mut map = Self {
            parameters: Vec::new(),
            entries: Entries::new(),
        };
        for (name, descriptor) in parameters {
            map.declare(name.into(), descriptor.into());
        }
        map
    }

    /// Adds parameters that accept values of any type
    pub fn with_untyped<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        for name in names {
            self.declare(name.into(), TypeDescriptor::Mixed);
        }
        self
    }

    /// Stores each of `entries` through the parameter checks
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidArgument` for the first entry naming an
    /// unknown parameter or holding a value of the wrong type.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set(Some(key.into()), value.into())?;
        }
        Ok(self)
    }

    /// The configured parameters and their types, in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> + '_ {
        self.parameters
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// A later declaration of the same name replaces its type
    fn declare(&mut self, name: String, descriptor: TypeDescriptor) {
        match self.parameters.iter_mut().find(|(existing, _)| *existing == name) {
            Some(parameter) => parameter.1 = descriptor,
            None => self.parameters.push((name, descriptor)),
        }
    }

    fn parameter_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.parameters
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, descriptor)| descriptor)
    }
}

impl Container for NamedParameterMap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: Option<Key>, value: Value) -> Result<(), CollectionError> {
        let key = require_key(key, &value)?;
        let name = key.to_string();

        let descriptor = self.parameter_type(&name).ok_or_else(|| {
            tracing::debug!(parameter = %name, "unconfigured parameter rejected");
            CollectionError::InvalidArgument(format!(
                "Attempting to set value for unconfigured parameter '{name}'"
            ))
        })?;
        if !descriptor.matches(&value) {
            tracing::debug!(parameter = %name, expected = %descriptor, value = %value, "parameter value rejected by type check");
            return Err(CollectionError::InvalidArgument(format!(
                "Value for '{name}' must be of type {descriptor}; value is {value}"
            )));
        }

        self.entries.insert(key, value);
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

impl MapInterface for NamedParameterMap {}

impl Restorable for NamedParameterMap {
    const KIND: ContainerKind = ContainerKind::NamedParameterMap;

    fn declared_types(&self) -> Vec<DeclaredType> {
        self.parameters
            .iter()
            .map(|(name, descriptor)| DeclaredType::named(name.clone(), descriptor.clone()))
            .collect()
    }

    fn rebuild(
        types: Vec<DeclaredType>,
        entries: Vec<(Key, Value)>,
    ) -> Result<Self, CollectionError> {
        let parameters = types
            .into_iter()
            .map(|declared| {
                let name = declared.name.ok_or_else(|| {
                    CollectionError::InvalidArgument(
                        "Snapshot declares a parameter without a name".to_string(),
                    )
                })?;
                Ok((name, declared.descriptor))
            })
            .collect::<Result<Vec<_>, CollectionError>>()?;
        Self::new(parameters).with_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn options() -> NamedParameterMap {
        NamedParameterMap::new([("port", "int"), ("ratio", "float")]).with_untyped(["anything"])
    }

    #[test]
    fn test_unconfigured_parameter() {
        let mut map = options();

        match map.set(Some(Key::from("user")), Value::from("ada")) {
            Err(CollectionError::InvalidArgument(message)) => {
                assert_eq!(message, "Attempting to set value for unconfigured parameter 'user'");
            }
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_parameter_type() {
        let mut map = options();

        match map.set(Some(Key::from("port")), Value::from("http")) {
            Err(CollectionError::InvalidArgument(message)) => {
                assert_eq!(message, "Value for 'port' must be of type int; value is http");
            }
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
        assert!(map.is_empty());
    }

    #[rstest]
    #[case("port", Value::Int(80))]
    #[case("ratio", Value::Float(0.5))]
    #[case("anything", Value::Null)]
    #[case("anything", Value::from(vec!["a"]))]
    fn test_accepted_values(#[case] name: &str, #[case] value: Value) {
        let mut map = options();

        map.set(Some(Key::from(name)), value.clone()).unwrap();
        assert_eq!(map.get(&Key::from(name)), Some(&value));
    }

    #[test]
    fn test_requires_a_key() {
        let mut map = options();
        assert!(map.set(None, Value::Int(1)).is_err());
    }

    #[test]
    fn test_parameters_in_declaration_order() {
        let map = options();
        let names: Vec<_> = map.parameters().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["port", "ratio", "anything"]);
    }

    #[test]
    fn test_snapshot_keeps_parameters() {
        let map = options()
            .with_entries([("port", Value::Int(8080)), ("anything", Value::from("x"))])
            .unwrap();

        let restored = NamedParameterMap::restore(&map.snapshot().unwrap(), &Default::default()).unwrap();
        assert_eq!(restored, map);
        assert_eq!(restored.parameters().count(), 3);
    }
}
