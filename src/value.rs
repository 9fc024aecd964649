//! Dynamic value representation for tablit data.
//!
//! ## Core Types
//!
//! - [`Value`]: any tablit value (number, string, boolean, opaque function, table)
//! - [`Number`]: an integer or a float
//! - [`Key`]: anything that may index a table (number, string, boolean, table)
//!
//! Tables are not stored inline. A [`Value::Table`] carries a [`TableId`]
//! into an [`Arena`](crate::Arena), and that id is the table's identity: two
//! values holding the same id refer to the same table, which is how shared
//! sub-tables and cycles are expressed.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use serde_tablit::{Arena, Number, Table, Value};
//!
//! let mut arena = Arena::new();
//!
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! assert!(number.is_number());
//! assert_eq!(text.as_str(), Some("hello"));
//!
//! let mut table = Table::new();
//! table.push(number);
//! table.insert("greeting", text);
//! let value = Value::Table(arena.insert(table));
//! assert!(value.is_table());
//! ```

use crate::arena::TableId;
use crate::grammar;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dynamically-typed tablit value.
///
/// Equality on [`Value::Table`] is identity equality (same [`TableId`]). Use
/// [`Arena::structural_eq`](crate::Arena::structural_eq) to compare contents.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{Number, Value};
///
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert!(Value::Function.is_function());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(Number),
    String(String),
    Bool(bool),
    /// An opaque callable. Encodes as an unreadable placeholder.
    Function,
    Table(TableId),
}

/// A numeric value: a 64-bit integer or a 64-bit float.
///
/// `Display` writes the tablit literal form, which parses back to the same
/// kind and value (floats always carry a fraction or exponent, and the
/// non-finite values use `1/0`, `-1/0` and `0/0`).
///
/// # Examples
///
/// ```rust
/// use serde_tablit::Number;
///
/// assert_eq!(Number::Integer(42).to_string(), "42");
/// assert_eq!(Number::Float(1.0).to_string(), "1.0");
/// assert_eq!(Number::Float(f64::INFINITY).to_string(), "1/0");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it has no fractional part and fits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tablit::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Float(f64::NAN).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                // i64::MAX as f64 rounds up to 2^63, which is out of range.
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => grammar::write_float(f, *fl),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A table key.
///
/// Keys compare and hash by value; float keys compare by bit pattern. Tables
/// normalize keys on insert and lookup, so an integral float key addresses
/// the same slot as the equivalent integer key.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{Key, Number};
///
/// assert_eq!(Key::from(Number::Float(2.0)), Key::from(2));
/// assert_eq!(Key::from(3).as_index(), Some(3));
/// assert_eq!(Key::from("name").as_str(), Some("name"));
/// ```
#[derive(Clone, Debug)]
pub enum Key {
    Number(Number),
    String(String),
    Bool(bool),
    Table(TableId),
}

impl Key {
    /// Returns the key with an integral float turned into an integer.
    #[must_use]
    pub fn normalized(self) -> Key {
        match self {
            Key::Number(Number::Float(f)) => match Number::Float(f).as_i64() {
                Some(i) => Key::Number(Number::Integer(i)),
                None => Key::Number(Number::Float(f)),
            },
            other => other,
        }
    }

    /// If the key is an integer, returns it.
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Number(Number::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// If the key is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the key is a table, returns its id.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<TableId> {
        match self {
            Key::Table(id) => Some(*id),
            _ => None,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Number(Number::Integer(a)), Key::Number(Number::Integer(b))) => a == b,
            (Key::Number(Number::Float(a)), Key::Number(Number::Float(b))) => {
                a.to_bits() == b.to_bits()
            }
            (Key::String(a), Key::String(b)) => a == b,
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Table(a), Key::Table(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Number(Number::Integer(i)) => {
                state.write_u8(0);
                i.hash(state);
            }
            Key::Number(Number::Float(f)) => {
                state.write_u8(1);
                f.to_bits().hash(state);
            }
            Key::String(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Key::Bool(b) => {
                state.write_u8(3);
                b.hash(state);
            }
            Key::Table(id) => {
                state.write_u8(4);
                id.hash(state);
            }
        }
    }
}

impl From<Number> for Key {
    fn from(value: Number) -> Self {
        Key::Number(value).normalized()
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Number(Number::Integer(value))
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::from(Number::Float(value))
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<TableId> for Key {
    fn from(value: TableId) -> Self {
        Key::Table(value)
    }
}

impl TryFrom<Value> for Key {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(Key::from(n)),
            Value::String(s) => Ok(Key::String(s)),
            Value::Bool(b) => Ok(Key::Bool(b)),
            Value::Table(id) => Ok(Key::Table(id)),
            Value::Function => Err(crate::Error::unsupported_type(
                "a function cannot be used as a table key",
            )),
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Number(n) => Value::Number(n),
            Key::String(s) => Value::String(s),
            Key::Bool(b) => Value::Bool(b),
            Key::Table(id) => Value::Table(id),
        }
    }
}

impl Value {
    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an opaque function.
    #[inline]
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Value::Function)
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer or a whole-number float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is a table, returns its id.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<TableId> {
        match self {
            Value::Table(id) => Some(*id),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Number(Number::Integer(_)) => "integer",
            Value::Number(Number::Float(_)) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Function => "function",
            Value::Table(_) => "table",
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::type_mismatch("integer", value.kind()))
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::type_mismatch("number", value.kind()))
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| crate::Error::type_mismatch("boolean", value.kind()))
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::type_mismatch("string", other.kind())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<TableId> for Value {
    fn from(value: TableId) -> Self {
        Value::Table(value)
    }
}
