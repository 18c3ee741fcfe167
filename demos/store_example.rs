//! Store example with complex state
//!
//! Run with `RUST_LOG=watchbox=trace cargo run --example store_example` to
//! see the store's own events.

use tracing_subscriber::EnvFilter;
use watchbox::Store;

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example ===\n");

    let store = Store::named(
        "todos",
        AppState {
            todos: vec![],
            filter: "all".to_string(),
        },
    );

    let active = store.subscribe(|state| {
        println!(
            "State updated! Active todos: {}",
            state.todos.iter().filter(|t| !t.completed).count()
        );
    });

    println!("Adding todo...");
    store.modify(|state| {
        state.todos.push(TodoItem {
            id: 1,
            text: "Learn Watchbox".to_string(),
            completed: false,
        });
    });

    println!("\nCompleting todo...");
    store.modify(|state| {
        if let Some(todo) = state.todos.first_mut() {
            todo.completed = true;
        }
    });

    // `set` is silent: no "State updated!" line for this one.
    println!("\nSwitching filter silently...");
    store.set(AppState {
        filter: "done".to_string(),
        ..store.get()
    });

    active.unsubscribe();
    println!("\nFinal state: {:#?}", store.get());
}
