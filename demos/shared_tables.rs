//! Shared sub-tables, cycles and the positional split.
//!
//! Run with: cargo run --example shared_tables

use serde_tablit::{decode, encode, table, Arena, Table, Value};

fn main() {
    let mut arena = Arena::new();

    // Indexes 1..3 are written positionally; index 11 would need seven
    // holes, which cost more than its key.
    let mut scores = Table::new();
    for (i, v) in [(1, 90), (2, 85), (3, 77), (11, 100)] {
        scores.insert(i, Value::from(v));
    }
    let scores = Value::Table(arena.insert(scores));
    println!("Split:   {}", encode(&arena, &scores));

    // The same table reached twice is written once.
    let config = table!(arena, { "debug" => false, "level" => 3 });
    let services = table!(arena, {
        "api" => config.clone(),
        "worker" => config,
    });
    println!("Shared:  {}", encode(&arena, &services));

    // A cycle terminates: the back-reference is dropped.
    let node = arena.insert(Table::new());
    if let Some(table) = arena.get_mut(node) {
        table.insert("name", Value::from("root"));
        table.insert("parent", Value::Table(node));
    }
    println!("Cycle:   {}", encode(&arena, &Value::Table(node)));

    // Decoding rebuilds the tables in a fresh arena.
    let text = encode(&arena, &scores);
    let mut decoded_arena = Arena::new();
    match decode(&text, &mut decoded_arena) {
        Some(decoded) => {
            assert!(arena.structural_eq(&scores, &decoded_arena, &decoded));
            println!("✓ Decoded {} table(s)", decoded_arena.len());
        }
        None => println!("✗ Could not decode {}", text),
    }

    // Anything beyond plain literals is refused.
    assert!(decode("{os.exit()}", &mut decoded_arena).is_none());
    println!("✓ Rejected non-literal input");
}
