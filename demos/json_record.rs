//! A store over a dynamic JSON record

use rxstore::{ReactiveStore, Record};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn record(value: Value) -> Record {
    match value {
        Value::Object(fields) => fields,
        _ => Record::new(),
    }
}

fn main() -> rxstore::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = ReactiveStore::builder(record(json!({ "name": "asdfasd", "age": 10 })))
        .name("profile")
        .fallible_interceptor(|state: Record| match state.get("age").and_then(Value::as_u64) {
            Some(age) if age > 150 => Err(format!("implausible age {age}")),
            _ => Ok(state),
        })
        .build();

    let _ages = store
        .select(|state: &Record| state.get("age").cloned())
        .subscribe(|age| println!("age: {age:?}"));

    println!("selected age: {:?}", store.snapshot_selected(|s| s.get("age").cloned()));

    for age in 0..3 {
        store.patch_state(record(json!({ "age": age })))?;
    }
    store.patch_state(record(json!({ "name": "renamed" })))?;

    if let Err(err) = store.patch_state(record(json!({ "age": 400 }))) {
        println!("rejected: {err}");
    }

    println!("state: {}", Value::Object(store.snapshot()));
    Ok(())
}
