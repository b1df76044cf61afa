use sovran_collections::{
    Collection, CollectionError, Container, Object, ObjectRef, ObjectRegistry, Restorable, Set,
    SortOrder, Value,
};
use std::any::Any;

// A native Rust type that lives in collections as an object
#[derive(Debug)]
struct Person {
    name: String,
    age: i64,
}

fn person(name: &str, age: i64) -> Value {
    Value::from(ObjectRef::new(Person {
        name: name.to_string(),
        age,
    }))
}

impl Person {
    fn greeting(&self) -> String {
        format!("Hello, I'm {}", self.name)
    }
}

impl Object for Person {
    fn class_name(&self) -> &str {
        "Person"
    }

    fn properties(&self) -> Vec<(String, Value)> {
        vec![
            ("name".to_string(), Value::from(self.name.as_str())),
            ("age".to_string(), Value::Int(self.age)),
        ]
    }

    fn call(&self, method: &str) -> Option<Value> {
        match method {
            "greeting" => Some(Value::from(self.greeting())),
            _ => None,
        }
    }

    fn to_display_string(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn main() -> Result<(), CollectionError> {
    let ada = person("Ada", 36);
    let grace = person("Grace", 45);
    let linus = person("Linus", 28);

    let team = Collection::with_values("Person", [ada.clone(), grace.clone(), linus])?;

    // Anything that isn't a Person is refused
    let mut attempt = team.clone();
    match attempt.add("Bob") {
        Ok(_) => println!("This shouldn't happen - a string is not a Person"),
        Err(e) => println!("Refused: {}", e),
    }

    println!("Names: {:?}", team.column("name")?);
    println!("Greetings: {:?}", team.column("greeting")?);

    let youngest_first = team.sort(Some("age"), SortOrder::Ascending)?;
    println!("Youngest first: {}", join(&youngest_first.values()));

    let oldest_first = team.sort(Some("age"), "desc".parse()?)?;
    println!("Oldest first: {}", join(&oldest_first.values()));

    let forty_five = team.where_eq(Some("age"), &Value::Int(45))?;
    println!("Aged 45: {}", join(&forty_five.values()));

    let total_age = team.reduce(0i64, |sum, member| {
        match member.as_object().and_then(|p| p.property("age")) {
            Some(Value::Int(age)) => sum + age,
            _ => sum,
        }
    });
    println!("Total age: {}", total_age);

    // diff and intersect compare by identity
    let leads = Collection::with_values("Person", [ada, grace])?;
    println!("Not leads: {}", join(&team.diff(&leads)?.values()));
    println!("Leads: {}", join(&team.intersect(&leads)?.values()));

    // Native access through downcasting
    if let Some(first) = team.first()?.as_object().and_then(|o| o.downcast_ref::<Person>()) {
        println!("First person says: {}", first.greeting());
    }

    let mut skills = Set::with_values("string", ["rust", "math"])?;
    for skill in ["rust", "compilers", "math"] {
        if !skills.add(skill)? {
            println!("Already have {}", skill);
        }
    }
    println!("Skills: {}", join(&skills.values()));

    // Snapshots only revive registered classes
    let blob = team.snapshot()?;
    let mut registry = ObjectRegistry::new();
    registry.register("Person", |properties| {
        let mut revived = Person {
            name: String::new(),
            age: 0,
        };
        for (name, value) in properties {
            match (name.as_str(), value) {
                ("name", Value::String(n)) => revived.name = n,
                ("age", Value::Int(a)) => revived.age = a,
                _ => {}
            }
        }
        Ok(ObjectRef::new(revived))
    });
    let restored = Collection::restore(&blob, &registry)?;
    println!("Restored: {}", join(&restored.values()));

    match Collection::restore(&blob, &ObjectRegistry::new()) {
        Ok(_) => println!("This shouldn't happen - Person is not registered"),
        Err(e) => println!("Restore refused: {}", e),
    }

    Ok(())
}

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
