//! Range notation for integer lists.
//!
//! Run with: cargo run --example ranges

use serde_tablit::{compress, Item};

fn main() {
    let pages = [9, 1, 2, 3, 5, 7, 8];
    println!("{:?} -> {}", pages, compress(pages));

    let mixed = vec![
        Item::from(4),
        Item::from(5),
        Item::from("appendix"),
        Item::from(6),
    ];
    println!("mixed -> {}", compress(mixed));

    println!("none  -> {:?}", compress(Vec::<i64>::new()));
}
