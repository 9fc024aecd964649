//! Property-based tests for the codec's core guarantees
//!
//! Generated value trees are acyclic and never share a table, so every one
//! of them must survive `decode(encode(v))` and re-encode to the same text.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_tablit::{compress, decode, encode, from_str, to_string, Arena, Key, Table, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Node {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Table(Vec<(Slot, Node)>),
}

#[derive(Clone, Debug)]
enum Slot {
    Next,
    Index(i64),
    Fraction(i32),
    Name(String),
    Flag(bool),
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        4 => Just(Slot::Next),
        3 => (-3i64..40).prop_map(Slot::Index),
        1 => any::<i32>().prop_map(Slot::Fraction),
        3 => "[a-z_][a-z0-9_]{0,6}|end|nil|[A-Z ]{1,4}|".prop_map(Slot::Name),
        1 => any::<bool>().prop_map(Slot::Flag),
    ]
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Node::Int),
        any::<f64>()
            .prop_filter("NaN never equals itself", |f| !f.is_nan())
            .prop_map(Node::Float),
        ".{0,12}".prop_map(Node::Str),
        any::<bool>().prop_map(Node::Bool),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec((slot(), inner), 0..8).prop_map(Node::Table)
    })
}

fn build(arena: &mut Arena, node: &Node) -> Value {
    match node {
        Node::Int(i) => Value::from(*i),
        Node::Float(f) => Value::from(*f),
        Node::Str(s) => Value::from(s.as_str()),
        Node::Bool(b) => Value::from(*b),
        Node::Table(entries) => {
            let mut table = Table::new();
            for (slot, child) in entries {
                let value = build(arena, child);
                match slot {
                    Slot::Next => table.push(value),
                    Slot::Index(i) => {
                        table.insert(*i, value);
                    }
                    Slot::Fraction(i) => {
                        table.insert(Key::from(*i as f64 + 0.5), value);
                    }
                    Slot::Name(name) => {
                        table.insert(name.as_str(), value);
                    }
                    Slot::Flag(b) => {
                        table.insert(*b, value);
                    }
                }
            }
            Value::Table(arena.insert(table))
        }
    }
}

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

/// Expands range notation back into the integers it stands for.
fn expand(text: &str) -> Vec<i64> {
    let mut out = Vec::new();
    for token in text.split(',').filter(|t| !t.is_empty()) {
        match token.split_once('~') {
            Some((first, last)) => {
                let first: i64 = first.parse().unwrap();
                let last: i64 = last.parse().unwrap();
                out.extend(first..=last);
            }
            None => out.push(token.parse().unwrap()),
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_decode_encode_is_structurally_equal(tree in node()) {
        let mut arena = Arena::new();
        let value = build(&mut arena, &tree);
        let text = encode(&arena, &value);

        let mut decoded_arena = Arena::new();
        let decoded = decode(&text, &mut decoded_arena);
        prop_assert!(decoded.is_some(), "failed to decode {}", text);
        let decoded = decoded.unwrap();
        prop_assert!(
            arena.structural_eq(&value, &decoded_arena, &decoded),
            "{} did not round trip",
            text
        );
    }

    #[test]
    fn prop_encoding_is_idempotent(tree in node()) {
        let mut arena = Arena::new();
        let value = build(&mut arena, &tree);
        let text = encode(&arena, &value);

        let mut decoded_arena = Arena::new();
        let decoded = decode(&text, &mut decoded_arena).unwrap();
        prop_assert_eq!(encode(&decoded_arena, &decoded), text);
    }

    #[test]
    fn prop_decode_never_panics_and_rolls_back(input in ".{0,40}") {
        let mut arena = Arena::new();
        let before = arena.len();
        if decode(&input, &mut arena).is_none() {
            prop_assert_eq!(arena.len(), before);
        }
    }

    #[test]
    fn prop_decode_mutated_text(tree in node(), cut in any::<prop::sample::Index>()) {
        let mut arena = Arena::new();
        let value = build(&mut arena, &tree);
        let text = encode(&arena, &value);
        let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        if !boundaries.is_empty() {
            let end = boundaries[cut.index(boundaries.len())];
            let mut scratch = Arena::new();
            let _ = decode(&text[..end], &mut scratch);
        }
    }

    #[test]
    fn prop_compress_expands_back(values in prop::collection::btree_set(-50i64..50, 0..30)) {
        let values: Vec<i64> = values.into_iter().collect();
        let text = compress(values.iter().copied());
        prop_assert_eq!(expand(&text), values);
    }

    #[test]
    fn prop_vec_i64(v in prop::collection::vec(any::<i64>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_string(s in ".*") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("NaN never equals itself", |f| !f.is_nan())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_vec_option_i32(v in prop::collection::vec(proptest::option::of(any::<i32>()), 0..20)) {
        // Trailing holes are not written, so compare against the trimmed input.
        let mut expected = v.clone();
        while expected.last() == Some(&None) {
            expected.pop();
        }
        let text = to_string(&v).unwrap();
        let back: Vec<Option<i32>> = from_str(&text).unwrap();
        prop_assert_eq!(back, expected);
    }

    #[test]
    fn prop_string_map(m in prop::collection::btree_map(".{0,8}", any::<i32>(), 0..10)) {
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_int_map(m in prop::collection::btree_map(-20i64..200, any::<bool>(), 0..30)) {
        let text = to_string(&m).unwrap();
        let back: BTreeMap<i64, bool> = from_str(&text).unwrap();
        prop_assert_eq!(back, m);
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }
}
