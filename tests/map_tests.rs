use rstest::rstest;
use sovran_collections::{
    AssociativeArrayMap, CollectionError, Container, Key, MapInterface, NamedParameterMap,
    Record, TypedMap, Value,
};

// Runs the shared associative contract against any map that accepts
// string keys with int values.
fn exercise_map_contract<M: MapInterface>(map: &mut M) -> Result<(), CollectionError> {
    assert_eq!(map.put(Key::from("a"), Value::Int(1))?, None);
    assert_eq!(map.put(Key::from("a"), Value::Int(2))?, Some(Value::Int(1)));
    assert!(map.contains_value(&Value::Int(2)));
    assert!(!map.contains_value(&Value::Int(1)));

    assert_eq!(map.put_if_absent(Key::from("b"), Value::Int(3))?, None);
    assert_eq!(map.put_if_absent(Key::from("b"), Value::Int(4))?, Some(Value::Int(3)));
    assert_eq!(map.keys(), vec![Key::from("a"), Key::from("b")]);

    assert!(!map.replace_if(&Key::from("b"), &Value::Int(4), Value::Int(5))?);
    assert!(map.replace_if(&Key::from("b"), &Value::Int(3), Value::Int(5))?);
    assert_eq!(map.replace(Key::from("c"), Value::Int(6))?, None);
    assert!(!map.contains_key(&Key::from("c")));

    assert!(map.remove_if(&Key::from("b"), &Value::Int(5)));
    assert_eq!(map.remove(&Key::from("a")), Some(Value::Int(2)));
    assert!(map.is_empty());
    assert_eq!(map.get_or(&Key::from("a"), Value::Null), Value::Null);
    Ok(())
}

#[test]
fn test_associative_array_map_contract() -> Result<(), CollectionError> {
    exercise_map_contract(&mut AssociativeArrayMap::new())
}

#[test]
fn test_typed_map_contract() -> Result<(), CollectionError> {
    exercise_map_contract(&mut TypedMap::new("string", "int"))
}

#[test]
fn test_named_parameter_map_contract() -> Result<(), CollectionError> {
    exercise_map_contract(&mut NamedParameterMap::new([("a", "int"), ("b", "int"), ("c", "int")]))
}

#[rstest]
#[case("int", "string", Key::Int(1), Value::from("one"), true)]
#[case("int", "string", Key::from("1"), Value::from("one"), false)]
#[case("string", "int", Key::Int(5), Value::Int(1), false)]
#[case("string", "float", Key::from("pi"), Value::Float(2.5), true)]
#[case("string", "float", Key::from("pi"), Value::Int(3), false)]
#[case("scalar", "mixed", Key::from("anything"), Value::Null, true)]
#[case("numeric", "bool", Key::Int(0), Value::Bool(false), true)]
#[case("string", "array", Key::from("list"), Value::from(vec![1, 2]), true)]
fn test_typed_map_checks_both_halves(
    #[case] key_type: &str,
    #[case] value_type: &str,
    #[case] key: Key,
    #[case] value: Value,
    #[case] accepted: bool,
) {
    let mut map = TypedMap::new(key_type, value_type);

    let result = map.set(Some(key.clone()), value.clone());

    assert_eq!(result.is_ok(), accepted);
    assert_eq!(map.get(&key).cloned(), if accepted { Some(value) } else { None });
}

#[test]
fn test_typed_map_of_objects() -> Result<(), CollectionError> {
    let ada = Record::new("Person").with_field("name", "Ada").into_ref();
    let mut people = TypedMap::new("int", "Person");

    people.put(Key::Int(1), ada.clone().into())?;

    assert!(people.contains_value(&Value::from(ada)));
    assert!(!people.contains_value(&Record::new("Person").with_field("name", "Ada").into_ref().into()));
    assert!(people.put(Key::Int(2), Record::new("Robot").into_ref().into()).is_err());
    Ok(())
}

#[test]
fn test_every_map_requires_a_key() {
    let message = "Map elements are key/value pairs; a key must be provided for value 1";

    let errors = [
        AssociativeArrayMap::new().set(None, Value::Int(1)),
        TypedMap::new("int", "int").set(None, Value::Int(1)),
        NamedParameterMap::new([("a", "int")]).set(None, Value::Int(1)),
    ];

    for error in errors {
        match error {
            Err(CollectionError::InvalidArgument(text)) => assert_eq!(text, message),
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
    }
}

#[test]
fn test_named_parameters_from_integer_keys() -> Result<(), CollectionError> {
    let mut map = NamedParameterMap::new([("0", "string")]);

    map.set(Some(Key::Int(0)), Value::from("zero"))?;

    assert_eq!(map.get(&Key::Int(0)), Some(&Value::from("zero")));
    Ok(())
}
