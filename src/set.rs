use crate::collection::{Membership, TypedCollection};
use crate::entries::Entries;
use crate::snapshot::ContainerKind;
use crate::value::Value;

/// Refuses a value when a strictly equal one is already stored
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Distinct;

impl Membership for Distinct {
    const KIND: ContainerKind = ContainerKind::Set;

    fn admits(entries: &Entries, value: &Value) -> bool {
        if entries.values().any(|stored| stored == value) {
            tracing::trace!(value = %value, "set already holds value; dropped");
            return false;
        }
        true
    }
}

/// A typed collection without duplicates
///
/// Adding a value the set already holds is not an error: `add` returns
/// `false` and a positional `set` does nothing.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Container, Key, Set, Value};
///
/// let mut set = Set::new("int");
/// assert!(set.add(5)?);
/// assert!(!set.add(5)?);
/// assert_eq!(set.len(), 1);
///
/// set.set(Some(Key::Int(9)), Value::Int(5))?;
/// assert!(!set.contains_key(&Key::Int(9)));
/// # Ok::<(), sovran_collections::CollectionError>(())
/// ```
pub type Set = TypedCollection<Distinct>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::entries::Key;
    use crate::error::CollectionError;
    use crate::object::Record;

    #[test]
    fn test_duplicates_are_refused() {
        let mut set = Set::new("string");

        assert!(set.add("a").unwrap());
        assert!(set.add("b").unwrap());
        assert!(!set.add("a").unwrap());
        assert_eq!(set.values(), vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_type_is_checked_before_membership() {
        let mut set = Set::with_values("int", [1]).unwrap();
        assert!(matches!(set.add("1"), Err(CollectionError::InvalidArgument(_))));
    }

    #[test]
    fn test_strictly_different_values_are_distinct() {
        let mut set = Set::new("mixed");

        assert!(set.add(1).unwrap());
        assert!(set.add(1.0).unwrap());
        assert!(set.add("1").unwrap());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_objects_are_distinct_by_identity() {
        let a = Record::new("Foo").with_field("id", 1).into_ref();
        let look_alike = Record::new("Foo").with_field("id", 1).into_ref();
        let mut set = Set::new("Foo");

        assert!(set.add(a.clone()).unwrap());
        assert!(!set.add(a).unwrap());
        assert!(set.add(look_alike).unwrap());
    }

    #[test]
    fn test_positional_duplicate_is_a_no_op() {
        let mut set = Set::with_values("int", [1, 2]).unwrap();

        set.set(Some(Key::Int(0)), Value::Int(2)).unwrap();
        assert_eq!(set.get(&Key::Int(0)), Some(&Value::Int(1)));

        set.set(Some(Key::Int(0)), Value::Int(3)).unwrap();
        assert_eq!(set.get(&Key::Int(0)), Some(&Value::Int(3)));
    }

    #[test]
    fn test_merge_drops_duplicates() {
        let left = Set::with_values("int", [1, 2]).unwrap();
        let right = Set::with_values("int", [2, 3]).unwrap();

        let merged = left.merge(&[&right]).unwrap();
        assert_eq!(merged.values(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_map_drops_mapped_duplicates() {
        let set = Set::with_values("int", [1, 2, 3]).unwrap();
        let parity = set.map(|value| match value {
            Value::Int(i) => Value::Int(i % 2),
            other => other.clone(),
        });
        assert_eq!(parity.values(), vec![Value::Int(1), Value::Int(0)]);
    }
}
