//! Demonstration of a store managing a todo list
//!
//! Run with `RUST_LOG=rxstore=trace` to see the store's log events.

use rxstore::{impl_patch, ReactiveStore};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum TodoFilter {
    All,
    Active,
    Completed,
}

#[derive(Clone, Debug, PartialEq)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: TodoFilter,
    // Derived by an interceptor.
    remaining: usize,
}

impl_patch! {
    AppState => pub struct AppStatePatch {
        todos: Vec<TodoItem>,
        filter: TodoFilter,
    }
}

impl AppState {
    fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: TodoFilter::All,
            remaining: 0,
        }
    }

    fn add_todo(&mut self, title: &str) {
        let id = self.todos.len();
        self.todos.push(TodoItem {
            id,
            title: title.to_string(),
            completed: false,
        });
    }

    fn toggle_todo(&mut self, id: usize) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
    }

    fn visible(&self) -> Vec<String> {
        self.todos
            .iter()
            .filter(|t| match self.filter {
                TodoFilter::All => true,
                TodoFilter::Active => !t.completed,
                TodoFilter::Completed => t.completed,
            })
            .map(|t| t.title.clone())
            .collect()
    }
}

fn main() -> rxstore::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example: Todo App ===\n");

    let store = ReactiveStore::builder(AppState::new())
        .name("todos")
        .interceptor(|mut state: AppState| {
            state.remaining = state.todos.iter().filter(|t| !t.completed).count();
            state
        })
        .build();

    println!("1. Subscribing to the remaining count and the visible list");
    let _remaining = store
        .select(|state: &AppState| state.remaining)
        .subscribe(|remaining| println!("   [remaining] {remaining}"));
    let _visible = store
        .select(AppState::visible)
        .subscribe(|titles| println!("   [visible] {titles:?}"));

    println!("\n2. Adding todos");
    store.update(|state| state.add_todo("Learn Rust"))?;
    store.update(|state| state.add_todo("Build a reactive store"))?;
    store.update(|state| state.add_todo("Write documentation"))?;

    println!("\n3. Completing the first todo");
    store.update(|state| state.toggle_todo(0))?;

    println!("\n4. Showing active todos only");
    store.patch_state(AppStatePatch {
        filter: Some(TodoFilter::Active),
        ..Default::default()
    })?;

    println!("\n5. Setting the same filter again (no notifications)");
    store.patch_state(AppStatePatch {
        filter: Some(TodoFilter::Active),
        ..Default::default()
    })?;

    println!("\n6. Resetting to defaults");
    store.reset_defaults()?;

    let snapshot = store.snapshot();
    println!("\n7. Final state: {snapshot:?}");

    println!("\n✓ Example complete!");
    Ok(())
}
