use sovran_collections::{
    CollectionError, Container, DoubleEndedQueue, Key, MapInterface, NamedParameterMap, Queue,
    Record, TypedMap, Value,
};

fn task(id: i64, title: &str) -> Record {
    Record::new("Task")
        .with_field("id", id)
        .with_field("title", title)
}

fn main() -> Result<(), CollectionError> {
    // Worker settings, each with its own type
    let mut settings = NamedParameterMap::new([("workers", "int"), ("name", "string")])
        .with_untyped(["labels"])
        .with_entries([("workers", Value::Int(2)), ("name", Value::from("builder"))])?;

    if let Err(e) = settings.put(Key::from("workers"), Value::from("many")) {
        println!("Refused setting: {}", e);
    }
    if let Err(e) = settings.put(Key::from("timeout"), Value::Int(30)) {
        println!("Refused setting: {}", e);
    }
    settings.put(Key::from("labels"), Value::from(vec!["ci", "nightly"]))?;
    println!("Settings: {:?}", settings.keys());

    let mut pending = Queue::new("Task");
    pending.add(task(1, "fetch").into_ref())?;
    pending.add(task(2, "compile").into_ref())?;
    pending.add(task(3, "test").into_ref())?;

    // offer reports refusal instead of failing
    if !pending.offer("not a task") {
        println!("Only tasks can be queued");
    }

    let mut attempts = TypedMap::new("int", "int");

    // Urgent work jumps the line at the front, cleanup waits at the back
    let mut work = DoubleEndedQueue::new("Task");
    while let Some(next) = pending.poll() {
        work.add_last(next)?;
    }
    work.add_first(task(0, "urgent fix").into_ref())?;
    work.add_last(task(99, "cleanup").into_ref())?;
    println!("Queued {} tasks", work.len());

    while let Some(next) = work.poll_first() {
        let id = match next.as_object().and_then(|t| t.property("id")) {
            Some(Value::Int(id)) => id,
            _ => continue,
        };
        let tries = match attempts.get_or(&Key::Int(id), Value::Int(0)) {
            Value::Int(tries) => tries + 1,
            _ => 1,
        };
        attempts.put(Key::Int(id), Value::Int(tries))?;

        let title = next.as_object().and_then(|t| t.property("title"));
        println!("Running task {}: {}", id, title.unwrap_or(Value::Null));

        // The compile step fails once and is retried last
        if id == 2 && tries == 1 {
            println!("Task {} failed, retrying later", id);
            work.add_last(next)?;
        }
    }

    match work.remove_last() {
        Ok(_) => println!("This shouldn't happen - the queue is empty"),
        Err(e) => println!("Done: {}", e),
    }

    for (id, tries) in attempts.iter() {
        println!("Task {} ran {} time(s)", id, tries);
    }

    Ok(())
}
