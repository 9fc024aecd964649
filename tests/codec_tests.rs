//! Text-level behavior of `encode`, `decode` and `compress`.

use serde_tablit::{
    compress, decode, encode, table, Arena, Item, Key, Number, Options, Parser, Table, Value,
};

fn roundtrip(arena: &Arena, value: &Value) -> (Arena, Value) {
    let text = encode(arena, value);
    let mut decoded_arena = Arena::new();
    let decoded = decode(&text, &mut decoded_arena)
        .unwrap_or_else(|| panic!("failed to decode {text}"));
    (decoded_arena, decoded)
}

fn mixed_table(arena: &mut Arena) -> Value {
    let inner = table!(arena, [1.5, "two", false]);
    let key_table = table!(arena, { "k" => 1 });
    let mut table = Table::new();
    table.insert(1, Value::from("first"));
    table.insert(2, inner);
    table.insert(4, Value::from(4));
    table.insert(0, Value::from("zero"));
    table.insert(-7, Value::from("negative"));
    table.insert(1000, Value::from("far"));
    table.insert(2.25, Value::from("fraction"));
    table.insert(true, Value::from("yes"));
    table.insert("name", Value::from("mixed"));
    table.insert("with space", Value::from("bracketed"));
    table.insert("while", Value::from("reserved"));
    table.insert(key_table.as_table().unwrap(), Value::from(f64::INFINITY));
    Value::Table(arena.insert(table))
}

#[test]
fn test_round_trip_preserves_structure() {
    let mut arena = Arena::new();
    let value = mixed_table(&mut arena);

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    assert!(arena.structural_eq(&value, &decoded_arena, &decoded));
}

#[test]
fn test_encoding_is_idempotent() {
    let mut arena = Arena::new();
    let value = mixed_table(&mut arena);
    let first = encode(&arena, &value);
    println!("Mixed table: {}", first);

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    assert_eq!(encode(&decoded_arena, &decoded), first);
}

#[test]
fn test_shared_table_appears_once() {
    let mut arena = Arena::new();
    let shared = table!(arena, [1, 2]);
    let value = table!(arena, { "a" => shared.clone(), "b" => shared });

    let text = encode(&arena, &value);
    assert_eq!(text, "{a={1,2}}");

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    let table = decoded_arena.get(decoded.as_table().unwrap()).unwrap();
    assert!(table.get("a").is_some());
    assert!(table.get("b").is_none());
}

#[test]
fn test_cycles_terminate() {
    let mut arena = Arena::new();
    let a = arena.insert(Table::new());
    let b = arena.insert(Table::new());
    if let Some(table) = arena.get_mut(a) {
        table.insert("next", Value::Table(b));
        table.insert("label", Value::from("a"));
    }
    if let Some(table) = arena.get_mut(b) {
        table.insert("next", Value::Table(a));
        table.insert("label", Value::from("b"));
    }

    let text = encode(&arena, &Value::Table(a));
    assert_eq!(text, r#"{next={label="b"},label="a"}"#);
}

#[test]
fn test_table_key_survives_dropped_entry() {
    let mut arena = Arena::new();
    let shared = table!(arena, [1]);
    let key = table!(arena, ["k"]);
    let mut table = Table::new();
    table.insert("a", shared.clone());
    table.insert(key.as_table().unwrap(), shared);
    table.insert("b", key);
    let value = Value::Table(arena.insert(table));

    let text = encode(&arena, &value);
    assert_eq!(text, r#"{a={1},b={"k"}}"#);

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    let table = decoded_arena.get(decoded.as_table().unwrap()).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.get("b").and_then(Value::as_table).is_some());
}

#[test]
fn test_split_point_scenario() {
    let mut arena = Arena::new();
    let mut table = Table::new();
    for i in 1..=3 {
        table.insert(i, Value::from(i));
    }
    table.insert(11, Value::from(100));
    let value = Value::Table(arena.insert(table));

    assert_eq!(encode(&arena, &value), "{1,2,3,[11]=100}");
}

#[test]
fn test_split_point_table_order_does_not_matter() {
    let mut arena = Arena::new();
    let value = table!(arena, { 3 => "c", "x" => 0, 1 => "a", 2 => "b" });
    assert_eq!(encode(&arena, &value), r#"{"a","b","c",x=0}"#);
}

#[test]
fn test_long_sequence_with_sparse_holes() {
    let mut arena = Arena::new();
    let mut table = Table::new();
    for i in 1..=120 {
        if i % 10 != 0 {
            table.insert(i, Value::from(i));
        }
    }
    let value = Value::Table(arena.insert(table));

    let text = encode(&arena, &value);
    assert!(!text.contains('['), "{text}");
    assert_eq!(text.matches("nil").count(), 11);

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    assert!(arena.structural_eq(&value, &decoded_arena, &decoded));
}

#[test]
fn test_key_forms() {
    let mut arena = Arena::new();
    let value = table!(arena, { "valid_name" => 1, "2lines" => 2 });
    assert_eq!(encode(&arena, &value), r#"{valid_name=1,["2lines"]=2}"#);
}

#[test]
fn test_number_forms() {
    let mut arena = Arena::new();
    let value = table!(arena, [1.0, 0.1, 1e300, -0.0, f64::NEG_INFINITY]);
    assert_eq!(encode(&arena, &value), "{1.0,0.1,1e300,-0.0,-1/0}");

    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    let table = decoded_arena.get(decoded.as_table().unwrap()).unwrap();
    assert_eq!(table.get(1), Some(&Value::Number(Number::Float(1.0))));
    assert_eq!(table.get(5), Some(&Value::from(f64::NEG_INFINITY)));
}

#[test]
fn test_integral_float_keys_become_integers() {
    let mut arena = Arena::new();
    let value = decode("{[2.0]=1,[1]=0}", &mut arena).unwrap();
    let table = arena.get(value.as_table().unwrap()).unwrap();
    assert_eq!(table.get(2), Some(&Value::from(1)));
    assert_eq!(encode(&arena, &value), "{0,1}");
}

#[test]
fn test_decoder_rejects_foreign_identifiers() {
    let mut arena = Arena::new();
    for input in [
        "{os}",
        "os",
        "{x=os}",
        "{[os]=1}",
        "{os.execute('rm')}",
        "{loadstring('x')()}",
        "{x=true}",
        "{1,2,3} and 4",
        "{...}",
        "{#t}",
        "function() end",
        "{function}",
        "{2^10}",
        "{\"a\"..\"b\"}",
        "-- comment\n{}",
    ] {
        assert_eq!(decode(input, &mut arena), None, "{input}");
    }
    assert!(arena.is_empty());
}

#[test]
fn test_function_never_round_trips() {
    let mut arena = Arena::new();
    let value = table!(arena, [1, Value::Function]);
    let text = encode(&arena, &value);
    assert_eq!(text, "{1,function}");
    assert_eq!(decode(&text, &mut Arena::new()), None);
}

#[test]
fn test_decoder_accepts_loose_layout() {
    let mut arena = Arena::new();
    let value = decode(
        "{\n  name = 'x';\n  [\"y\"] = { 1 , 2 , } ,\n  0x10,\n}\n",
        &mut arena,
    )
    .unwrap();
    assert_eq!(encode(&arena, &value), r#"{16,name="x",y={1,2}}"#);
}

#[test]
fn test_parser_recursion_limit() {
    let options = Options::new().with_recursion_limit(10);
    let mut arena = Arena::new();
    let deep = format!("{}{}", "{".repeat(11), "}".repeat(11));
    assert!(Parser::new(&deep, &mut arena, &options).parse().is_err());

    let shallow = format!("{}{}", "{".repeat(10), "}".repeat(10));
    assert!(Parser::new(&shallow, &mut arena, &options).parse().is_ok());
}

#[test]
fn test_deep_encode_is_iterative() {
    let mut arena = Arena::new();
    let mut value = table!(arena, []);
    for _ in 0..50_000 {
        value = table!(arena, [value]);
    }
    let text = encode(&arena, &value);
    assert_eq!(text.len(), 2 * 50_001);
}

#[test]
fn test_table_keys_round_trip() {
    let mut arena = Arena::new();
    let key = table!(arena, ["k"]);
    let mut table = Table::new();
    table.insert(Key::Table(key.as_table().unwrap()), Value::from(1));
    let value = Value::Table(arena.insert(table));

    assert_eq!(encode(&arena, &value), r#"{[{"k"}]=1}"#);
    let (decoded_arena, decoded) = roundtrip(&arena, &value);
    assert!(arena.structural_eq(&value, &decoded_arena, &decoded));
}

#[test]
fn test_range_compression() {
    assert_eq!(compress([1, 2, 3, 5, 7, 8, 9]), "1~3,5,7~9");
    assert_eq!(compress([4, 5]), "4,5");
    assert_eq!(
        compress([Item::from(1), Item::from(2), Item::from(3), Item::from("x")]),
        "1~3,x"
    );
    assert_eq!(compress(Vec::<Item>::new()), "");
    assert_eq!(compress([Item::from("x")]), ",x");
}
