//! Basic example of using an event to notify interested parties of changes.
//!
//! This example demonstrates the simplest usage pattern of the fanout package: creating an
//! event, registering listeners, broadcasting to them and removing them again.

use fanout::{Event, Listener, send};

fn main() {
    println!("=== Fanout Basic Example ===");

    // Create an event for passing string messages.
    let on_did_change = Event::<String>::new();

    // A closure registered directly can only be removed through its subscription.
    let subscription = on_did_change.on(|data: &String| println!("First listener got: {data}"));

    // A listener created up front can also be removed via `off()`.
    let second = Listener::new(|data: &String| println!("Second listener got: {data}"));
    on_did_change.on(second.clone());

    println!("Broadcasting to {} listeners...", on_did_change.len());
    send(&on_did_change, "Hello from fanout!".to_string());

    subscription.unsubscribe();
    println!("Broadcasting to {} listener...", on_did_change.len());
    send(&on_did_change, "Only the second listener sees this.".to_string());

    on_did_change.off(&second);
    println!("Broadcasting to {} listeners...", on_did_change.len());
    send(&on_did_change, "Nobody sees this.".to_string());

    // Listener panics are contained and the broadcast continues.
    on_did_change.on(|_: &String| panic!("this listener always fails"));
    on_did_change.on(|data: &String| println!("Listener after the failing one got: {data}"));
    send(&on_did_change, "Still delivered.".to_string());

    on_did_change.dispose();
    println!("Example completed successfully!");
}
