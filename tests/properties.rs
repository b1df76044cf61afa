use proptest::prelude::*;
use sovran_collections::{
    compare_values, Collection, Container, DoubleEndedQueue, ObjectRegistry, Queue, Restorable,
    Set, SortOrder, TypeDescriptor, Value,
};
use std::cmp::Ordering;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z0-9]{0,6}".prop_map(Value::String),
    ]
}

// Every value a snapshot can capture, floats included
fn portable() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        prop::sample::select(vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY]).prop_map(Value::Float),
        ".{0,12}".prop_map(Value::String),
    ]
}

// Strict equality, except that NaN matches NaN
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) if x.is_nan() => y.is_nan(),
        _ => a == b,
    }
}

proptest! {
    #[test]
    fn prop_add_succeeds_exactly_when_the_type_matches(
        type_name in prop::sample::select(vec!["int", "float", "string", "bool", "null", "scalar", "numeric"]),
        values in prop::collection::vec(scalar(), 0..40)
    ) {
        let descriptor = TypeDescriptor::parse(type_name);
        let mut collection = Collection::new(type_name);

        for value in values {
            let before = collection.len();
            let expected = descriptor.matches(&value);

            prop_assert_eq!(collection.add(value).is_ok(), expected);
            prop_assert_eq!(collection.len(), before + usize::from(expected));
        }
    }

    #[test]
    fn prop_set_never_holds_duplicates(values in prop::collection::vec(-10i64..10, 0..60)) {
        let mut set = Set::new("int");

        for value in values {
            let present = set.contains(&Value::Int(value));
            let before = set.len();

            prop_assert_eq!(set.add(value).unwrap(), !present);
            prop_assert_eq!(set.len(), before + usize::from(!present));
        }

        let stored = set.values();
        for (i, a) in stored.iter().enumerate() {
            for b in &stored[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn prop_queue_is_fifo(values in prop::collection::vec(".{0,8}", 0..40)) {
        let mut queue = Queue::with_values("string", values.iter().map(String::as_str)).unwrap();

        let mut polled = Vec::new();
        while let Some(value) = queue.poll() {
            polled.push(value);
        }

        let expected: Vec<Value> = values.into_iter().map(Value::from).collect();
        prop_assert_eq!(polled, expected);
        prop_assert!(queue.peek().is_none());
    }

    #[test]
    fn prop_deque_ends_are_independent(
        values in prop::collection::vec(any::<i64>(), 0..30),
        first in any::<i64>(),
        last in any::<i64>()
    ) {
        let mut deque = DoubleEndedQueue::with_values("int", values.clone()).unwrap();

        deque.add_first(first).unwrap();
        prop_assert_eq!(deque.peek_first(), Some(&Value::Int(first)));
        deque.add_last(last).unwrap();
        prop_assert_eq!(deque.peek_last(), Some(&Value::Int(last)));

        deque.remove_first().unwrap();
        deque.remove_last().unwrap();
        let middle: Vec<Value> = values.into_iter().map(Value::Int).collect();
        prop_assert_eq!(deque.values(), middle);
    }

    #[test]
    fn prop_algebra_never_mutates_the_receiver(
        left in prop::collection::vec(scalar(), 0..30),
        right in prop::collection::vec(scalar(), 0..30)
    ) {
        let left = Collection::with_values("mixed", left).unwrap();
        let right = Collection::with_values("mixed", right).unwrap();
        let before = left.to_array();

        let sorted = left.sort(None, SortOrder::Ascending).unwrap();
        let _ = left.filter(|value| value.truthy());
        let _ = left.where_eq(None, &Value::Null).unwrap();
        let _ = left.map(|value| value.clone());
        let _ = left.diff(&right).unwrap();
        let _ = left.intersect(&right).unwrap();
        let _ = left.merge(&[&right, &left]).unwrap();
        let _ = left.unique(None).unwrap();

        prop_assert_eq!(left.to_array(), before);
        prop_assert_eq!(sorted.len(), left.len());
    }

    #[test]
    fn prop_sort_orders_by_compare_values(values in prop::collection::vec(-1000i64..1000, 0..50)) {
        let collection = Collection::with_values("int", values).unwrap();

        let ascending = collection.sort(None, SortOrder::Ascending).unwrap().values();
        for pair in ascending.windows(2) {
            prop_assert_ne!(compare_values(&pair[0], &pair[1]), Ordering::Greater);
        }

        let descending = collection.sort(None, SortOrder::Descending).unwrap().values();
        for pair in descending.windows(2) {
            prop_assert_ne!(compare_values(&pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn prop_snapshot_round_trip(values in prop::collection::vec(portable(), 0..30)) {
        let collection = Collection::with_values("mixed", values).unwrap();

        let blob = collection.snapshot().unwrap();
        let restored = Collection::restore(&blob, &ObjectRegistry::new()).unwrap();

        prop_assert_eq!(restored.len(), collection.len());
        for ((key_a, a), (key_b, b)) in restored.iter().zip(collection.iter()) {
            prop_assert_eq!(key_a, key_b);
            prop_assert!(same_value(a, b), "{:?} restored as {:?}", b, a);
        }
        prop_assert_eq!(restored.element_type(), collection.element_type());
    }
}
