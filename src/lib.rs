//! # serde_tablit
//!
//! A compact table-literal ("tablit") codec for dynamic values, with Serde support.
//!
//! ## What is tablit?
//!
//! Tablit text is a single literal built from numbers, strings, booleans and
//! tables, where a table freely mixes positional and keyed entries:
//!
//! ```text
//! {1,2,3,[11]=100,name="x",flags={T,F}}
//! ```
//!
//! ## Key Features
//!
//! - **Optimal split**: for every table the encoder picks how many leading
//!   integer keys to write positionally, bridging small gaps with `nil` holes
//!   when that is shorter than writing the keys
//! - **Shared tables**: tables live in an [`Arena`] and are identified by
//!   [`TableId`]; a table reached twice is written once and cycles terminate
//! - **Safe decoding**: the decoder is a literal parser with a closed
//!   vocabulary (`T`, `F`, `nil`) and a nesting limit, never an evaluator
//! - **Serde compatible**: any `T: Serialize` / `T: Deserialize` goes
//!   through [`to_string`] and [`from_str`]
//! - **Range notation**: [`compress`] writes integer lists as `1~3,5,7~9`
//!
//! ## Quick Start
//!
//! ### Dynamic values
//!
//! ```rust
//! use serde_tablit::{decode, encode, table, Arena};
//!
//! let mut arena = Arena::new();
//! let value = table!(arena, {
//!     "name" => "Alice",
//!     "scores" => table!(arena, [90, 85, 77]),
//! });
//!
//! let text = encode(&arena, &value);
//! assert_eq!(text, r#"{name="Alice",scores={90,85,77}}"#);
//!
//! let mut decoded_arena = Arena::new();
//! let decoded = decode(&text, &mut decoded_arena).unwrap();
//! assert!(arena.structural_eq(&value, &decoded_arena, &decoded));
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tablit::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     tags: vec!["admin".to_string()],
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"{id=123,name="Alice",tags={"admin"}}"#);
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ## Lossy cases
//!
//! - A table reached a second time is left out: a keyed entry referring to it
//!   is dropped, a positional one becomes a hole.
//! - [`Value::Function`] is written as the placeholder `function`, which the
//!   decoder rejects.
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: split decisions and dropped tables at
//! `trace`, rejected input at `debug`. No subscriber is installed.
//!
//! ## Grammar
//!
//! See the [`grammar`] module for the full text format and the cost model.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Serde round trip of a struct
//! - **`shared_tables.rs`** - Shared sub-tables, cycles and the split point
//! - **`ranges.rs`** - Range notation
//!
//! Run any example with: `cargo run --example <name>`

pub mod arena;
pub mod de;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod range;
pub mod ser;
pub mod value;

pub use arena::{Arena, TableId};
pub use de::{Parser, ValueDeserializer};
pub use error::{Error, Result};
pub use map::Table;
pub use options::Options;
pub use range::{compress, Item};
pub use ser::{Encoder, ValueSerializer};
pub use value::{Key, Number, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Encodes `value` and every table it reaches as tablit text.
///
/// Never fails. See [`Encoder`] for how shared tables are handled.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{encode, Arena, Table, Value};
///
/// let mut arena = Arena::new();
/// let mut table = Table::new();
/// table.insert(1, Value::from("a"));
/// table.insert(3, Value::from("c"));
/// table.insert(4, Value::from("d"));
/// let value = Value::Table(arena.insert(table));
///
/// assert_eq!(encode(&arena, &value), r#"{"a",nil,"c","d"}"#);
/// ```
#[must_use]
pub fn encode(arena: &Arena, value: &Value) -> String {
    encode_with_options(arena, value, &Options::default())
}

/// Encodes `value` with custom options.
#[must_use]
pub fn encode_with_options(arena: &Arena, value: &Value, options: &Options) -> String {
    Encoder::new(arena, options).encode(value)
}

/// Decodes tablit text, storing its tables in `arena`.
///
/// Returns `None` for the document `nil` and for any malformed or
/// disallowed input; in the latter case `arena` is left as it was. Use
/// [`Parser`] to get the error itself.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{decode, Arena, Value};
///
/// let mut arena = Arena::new();
/// assert_eq!(decode("-0.5", &mut arena), Some(Value::from(-0.5)));
/// assert_eq!(decode("{os.exit()}", &mut arena), None);
/// assert!(arena.is_empty());
/// ```
pub fn decode(text: &str, arena: &mut Arena) -> Option<Value> {
    decode_with_options(text, arena, &Options::default())
}

/// Decodes tablit text with custom options.
pub fn decode_with_options(text: &str, arena: &mut Arena, options: &Options) -> Option<Value> {
    match Parser::new(text, arena, options).parse() {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "rejected tablit input");
            None
        }
    }
}

/// Serialize any `T: Serialize` to a tablit string.
///
/// A value with no representation (`None`, `()`) is written as `nil`.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "{x=1,y=2}");
/// assert_eq!(to_string(&vec![Some(1), None, Some(3), Some(4)]).unwrap(), "{1,nil,3,4}");
/// assert_eq!(to_string(&None::<i32>).unwrap(), "nil");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented, e.g. a map key that
/// serializes to nothing.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &Options::default())
}

/// Serialize any `T: Serialize` to a tablit string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{to_string_with_options, Options};
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("key", 1);
/// let options = Options::new().with_bare_keys(false);
/// assert_eq!(to_string_with_options(&map, &options).unwrap(), r#"{["key"]=1}"#);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut arena = Arena::new();
    Ok(match to_value(&mut arena, value)? {
        Some(value) => encode_with_options(&arena, &value, options),
        None => grammar::NIL.to_string(),
    })
}

/// Serialize any `T: Serialize` to a writer as tablit text.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &("a", 1)).unwrap();
/// assert_eq!(buffer, br#"{"a",1}"#);
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Convert any `T: Serialize` into a [`Value`] whose tables are stored in `arena`.
///
/// Returns `Ok(None)` for values with no representation (`None`, `()`).
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{to_value, Arena};
///
/// let mut arena = Arena::new();
/// let value = to_value(&mut arena, &[1, 2, 3]).unwrap().unwrap();
/// let table = arena.get(value.as_table().unwrap()).unwrap();
/// assert_eq!(table.len(), 3);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(arena: &mut Arena, value: &T) -> Result<Option<Value>>
where
    T: ?Sized + Serialize,
{
    ser::to_arena_value(arena, value)
}

/// Deserialize an instance of type `T` from tablit text.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{x=1; y=2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid tablit or cannot be
/// deserialized to type `T`. Syntax errors include line and column
/// information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &Options::default())
}

/// Deserialize an instance of type `T` from tablit text with custom options.
///
/// # Errors
///
/// Returns an error if the text is not valid tablit, nests deeper than
/// `options.recursion_limit`, or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &Options) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut arena = Arena::new();
    let value = Parser::new(s, &mut arena, options).parse()?;
    T::deserialize(ValueDeserializer::new(&arena, value.as_ref(), options))
}

/// Deserialize an instance of type `T` from an I/O stream of tablit text.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<u8> = from_reader(Cursor::new(b"{1,2,3}")).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// tablit, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of tablit text.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::from_slice;
///
/// let pair: (String, bool) = from_slice(b"{'on',T}").unwrap();
/// assert_eq!(pair, ("on".to_string(), true));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid tablit, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from a [`Value`] stored in `arena`.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{from_value, table, Arena};
/// use std::collections::HashMap;
///
/// let mut arena = Arena::new();
/// let value = table!(arena, { "a" => 1, "b" => 2 });
/// let map: HashMap<String, i32> = from_value(&arena, &value).unwrap();
/// assert_eq!(map["b"], 2);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<'a, T>(arena: &'a Arena, value: &'a Value) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(ValueDeserializer::new(arena, Some(value), &Options::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Inventory {
        owner: String,
        items: Vec<Item>,
        prices: HashMap<String, f64>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Item {
        id: u32,
        label: Option<String>,
    }

    #[test]
    fn test_round_trip_struct() {
        let mut prices = HashMap::new();
        prices.insert("apple".to_string(), 0.5);
        let inventory = Inventory {
            owner: "bob".to_string(),
            items: vec![
                Item { id: 1, label: Some("first".to_string()) },
                Item { id: 2, label: None },
            ],
            prices,
        };
        let text = to_string(&inventory).unwrap();
        let back: Inventory = from_str(&text).unwrap();
        assert_eq!(back, inventory);
    }

    #[test]
    fn test_decode_failure_leaves_arena() {
        let mut arena = Arena::new();
        let kept = decode("{1}", &mut arena).unwrap();
        assert_eq!(decode("{{2},x}", &mut arena), None);
        assert_eq!(arena.len(), 1);
        assert_eq!(encode(&arena, &kept), "{1}");
    }

    #[test]
    fn test_nil_document() {
        let mut arena = Arena::new();
        assert_eq!(decode("nil", &mut arena), None);
        assert_eq!(from_str::<Option<i32>>("nil").unwrap(), None);
        assert_eq!(to_string(&()).unwrap(), "nil");
    }

    #[test]
    fn test_from_slice_rejects_bad_utf8() {
        assert!(from_slice::<String>(&[b'"', 0xff, b'"']).is_err());
    }

    #[test]
    fn test_to_writer_reports_io_errors() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        assert!(matches!(to_writer(Broken, &1), Err(Error::Io(_))));
    }
}
