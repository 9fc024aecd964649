//! Tablit decoding.
//!
//! This module provides the [`Parser`], which reads tablit text into values
//! stored in an [`Arena`], and [`ValueDeserializer`], which drives any
//! `T: Deserialize` from such values.
//!
//! ## Overview
//!
//! The parser is a plain recursive-descent reader over the grammar described
//! in [`grammar`](crate::grammar). Nothing is evaluated:
//!
//! - **Closed vocabulary**: the only names are `T`, `F` and `nil`; any other
//!   bare word is an error unless it is a key followed by `=`
//! - **All or nothing**: on failure every table allocated by the call is
//!   removed from the arena again
//! - **Bounded depth**: nesting beyond
//!   [`Options::recursion_limit`](crate::Options) is rejected
//! - **Error reporting**: errors carry line and column information
//!
//! ```rust
//! use serde_tablit::{decode, Arena, Value};
//!
//! let mut arena = Arena::new();
//! let value = decode("{1,nil,3;name='x'}", &mut arena).unwrap();
//! let table = arena.get(value.as_table().unwrap()).unwrap();
//!
//! assert_eq!(table.get(1), Some(&Value::from(1)));
//! assert_eq!(table.get(2), None);
//! assert_eq!(table.get("name"), Some(&Value::from("x")));
//!
//! // Anything that is not a literal is refused.
//! assert!(decode("{os.exit()}", &mut arena).is_none());
//! ```

use crate::arena::TableId;
use crate::grammar::{self, RESERVED_WORDS};
use crate::{Arena, Error, Key, Number, Options, Result, Table, Value};
use serde::{de, forward_to_deserialize_any};

/// Reads one tablit document into an [`Arena`].
///
/// Created with [`Parser::new`] and consumed by [`Parser::parse`].
pub struct Parser<'de, 'a> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    limit: usize,
    arena: &'a mut Arena,
}

#[derive(Clone, Copy)]
struct Cursor {
    position: usize,
    line: usize,
    column: usize,
}

impl<'de, 'a> Parser<'de, 'a> {
    pub fn new(input: &'de str, arena: &'a mut Arena, options: &Options) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            limit: options.recursion_limit,
            arena,
        }
    }

    /// Parses the whole input.
    ///
    /// Returns `Ok(None)` for the document `nil`. On error the arena is
    /// truncated to its length before the call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tablit::{Arena, Error, Options, Parser};
    ///
    /// let mut arena = Arena::new();
    /// let err = Parser::new("{1,\n  os}", &mut arena, &Options::default())
    ///     .parse()
    ///     .unwrap_err();
    /// assert!(matches!(err, Error::Syntax { line: 2, col: 3, .. }));
    /// assert!(arena.is_empty());
    /// ```
    pub fn parse(mut self) -> Result<Option<Value>> {
        let mark = self.arena.len();
        let result = self.parse_document();
        if result.is_err() {
            self.arena.truncate(mark);
        }
        result
    }

    fn parse_document(&mut self) -> Result<Option<Value>> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("trailing characters after value"));
        }
        Ok(value)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.next_char();
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn save(&self) -> Cursor {
        Cursor {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, cursor: Cursor) {
        self.position = cursor.position;
        self.line = cursor.line;
        self.column = cursor.column;
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.next_char();
                Ok(())
            }
            Some(ch) => Err(self.error(&format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.eof(&format!("'{expected}'"))),
        }
    }

    /// Parses a value; `nil` yields `None`.
    fn parse_value(&mut self) -> Result<Option<Value>> {
        match self.peek_char() {
            None => Err(self.eof("a value")),
            Some('{') => self.parse_table().map(Some),
            Some('"' | '\'') => Ok(Some(Value::String(self.parse_string()?))),
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '.' => {
                Ok(Some(Value::Number(self.parse_number()?)))
            }
            Some(ch) if is_name_start(ch) => {
                let start = self.save();
                match self.parse_name() {
                    grammar::TRUE => Ok(Some(Value::Bool(true))),
                    grammar::FALSE => Ok(Some(Value::Bool(false))),
                    grammar::NIL => Ok(None),
                    other => {
                        self.restore(start);
                        Err(self.error(&format!("unexpected identifier `{other}`")))
                    }
                }
            }
            Some(ch) => Err(self.error(&format!("unexpected character '{ch}'"))),
        }
    }

    fn parse_name(&mut self) -> &'de str {
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        &input[start..self.position]
    }

    fn parse_table(&mut self) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        self.expect('{')?;
        self.depth += 1;
        if self.depth > self.limit {
            return Err(Error::recursion_limit(line, col, self.limit));
        }

        let mut table = Table::new();
        let mut next_index = 1i64;
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => return Err(self.eof("'}'")),
                Some('}') => {
                    self.next_char();
                    break;
                }
                Some(_) => {}
            }

            self.parse_entry(&mut table, &mut next_index)?;

            self.skip_whitespace();
            match self.peek_char() {
                Some(',' | ';') => {
                    self.next_char();
                }
                Some('}') => {
                    self.next_char();
                    break;
                }
                Some(ch) => {
                    return Err(self.error(&format!("expected ',' or '}}', found '{ch}'")));
                }
                None => return Err(self.eof("',' or '}'")),
            }
        }

        self.depth -= 1;
        Ok(Value::Table(self.arena.insert(table)))
    }

    fn parse_entry(&mut self, table: &mut Table, next_index: &mut i64) -> Result<()> {
        match self.peek_char() {
            Some('[') => {
                self.next_char();
                self.skip_whitespace();
                let key = match self.parse_value()? {
                    Some(key) => Key::try_from(key)?,
                    None => return Err(self.error("nil cannot be a key")),
                };
                self.skip_whitespace();
                self.expect(']')?;
                self.skip_whitespace();
                self.expect('=')?;
                self.skip_whitespace();
                if let Some(value) = self.parse_value()? {
                    table.insert(key, value);
                }
                Ok(())
            }
            Some(ch) if is_name_start(ch) => {
                let start = self.save();
                let name = self.parse_name();
                self.skip_whitespace();
                if self.peek_char() == Some('=') && !RESERVED_WORDS.contains(&name) {
                    self.next_char();
                    self.skip_whitespace();
                    if let Some(value) = self.parse_value()? {
                        table.insert(name, value);
                    }
                    Ok(())
                } else {
                    self.restore(start);
                    self.parse_positional(table, next_index)
                }
            }
            _ => self.parse_positional(table, next_index),
        }
    }

    fn parse_positional(&mut self, table: &mut Table, next_index: &mut i64) -> Result<()> {
        if let Some(value) = self.parse_value()? {
            table.insert(*next_index, value);
        }
        *next_index += 1;
        Ok(())
    }

    fn parse_string(&mut self) -> Result<String> {
        let Some(quote) = self.next_char() else {
            return Err(self.eof("a string"));
        };
        let mut bytes = Vec::new();
        loop {
            match self.next_char() {
                None => return Err(self.eof("closing quote")),
                Some('\n') => return Err(self.error("unfinished string")),
                Some(ch) if ch == quote => break,
                Some('\\') => self.parse_escape(&mut bytes)?,
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error("string is not valid UTF-8"))
    }

    fn parse_escape(&mut self, bytes: &mut Vec<u8>) -> Result<()> {
        let byte = match self.next_char() {
            None => return Err(self.eof("escape sequence")),
            Some('n') => b'\n',
            Some('r') => b'\r',
            Some('t') => b'\t',
            Some('a') => 0x07,
            Some('b') => 0x08,
            Some('f') => 0x0c,
            Some('v') => 0x0b,
            Some('\\') => b'\\',
            Some('"') => b'"',
            Some('\'') => b'\'',
            Some('\n') => b'\n',
            Some('x') => {
                let mut code = 0u8;
                for _ in 0..2 {
                    let digit = self
                        .next_char()
                        .and_then(|ch| ch.to_digit(16))
                        .ok_or_else(|| self.error("invalid \\x escape"))?;
                    code = code * 16 + digit as u8;
                }
                code
            }
            Some('u') => {
                self.expect('{')?;
                let mut code = 0u32;
                let mut digits = 0;
                while let Some(digit) = self.peek_char().and_then(|ch| ch.to_digit(16)) {
                    self.next_char();
                    code = code
                        .checked_mul(16)
                        .map(|c| c + digit)
                        .ok_or_else(|| self.error("\\u escape out of range"))?;
                    digits += 1;
                }
                if digits == 0 {
                    return Err(self.error("invalid \\u escape"));
                }
                self.expect('}')?;
                let ch = char::from_u32(code).ok_or_else(|| self.error("invalid code point"))?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                return Ok(());
            }
            Some(first) if first.is_ascii_digit() => {
                let mut code = first as u32 - '0' as u32;
                for _ in 0..2 {
                    match self.peek_char().and_then(|ch| ch.to_digit(10)) {
                        Some(digit) => {
                            self.next_char();
                            code = code * 10 + digit;
                        }
                        None => break,
                    }
                }
                u8::try_from(code).map_err(|_| self.error("decimal escape too large"))?
            }
            Some(ch) => return Err(self.error(&format!("invalid escape '\\{ch}'"))),
        };
        bytes.push(byte);
        Ok(())
    }

    fn parse_number(&mut self) -> Result<Number> {
        let input = self.input;
        let start = self.position;
        let negative = self.peek_char() == Some('-');
        if negative {
            self.next_char();
        }

        let rest = &input[self.position..];
        if rest.starts_with("0x") || rest.starts_with("0X") {
            return self.parse_hex(negative);
        }

        let mut digits = self.skip_digits();
        let mut is_float = false;
        if self.peek_char() == Some('.') {
            self.next_char();
            is_float = true;
            digits += self.skip_digits();
        }
        if digits == 0 {
            return Err(self.error("expected digits"));
        }
        if let Some('e' | 'E') = self.peek_char() {
            self.next_char();
            is_float = true;
            if let Some('+' | '-') = self.peek_char() {
                self.next_char();
            }
            if self.skip_digits() == 0 {
                return Err(self.error("expected exponent digits"));
            }
        }

        let text = &input[start..self.position];
        if self.peek_char() == Some('/') {
            return self.parse_non_finite(text);
        }

        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
        }
        text.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| self.error("invalid number"))
    }

    fn skip_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.next_char();
            count += 1;
        }
        count
    }

    fn parse_hex(&mut self, negative: bool) -> Result<Number> {
        self.next_char();
        self.next_char();
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if !ch.is_ascii_hexdigit() {
                break;
            }
            self.next_char();
        }
        let digits = &input[start..self.position];
        if digits.is_empty() {
            return Err(self.error("expected hex digits"));
        }
        let magnitude =
            i64::from_str_radix(digits, 16).map_err(|_| self.error("hex literal out of range"))?;
        Ok(Number::Integer(if negative { -magnitude } else { magnitude }))
    }

    /// Only the three literal divisions that spell the non-finite floats.
    fn parse_non_finite(&mut self, numerator: &str) -> Result<Number> {
        let at = self.save();
        self.next_char();
        let denominator = self.skip_digits();
        let exact_zero = denominator == 1 && &self.input[at.position + 1..self.position] == "0";
        let value = match numerator {
            "1" if exact_zero => f64::INFINITY,
            "-1" if exact_zero => f64::NEG_INFINITY,
            "0" if exact_zero => f64::NAN,
            _ => {
                self.restore(at);
                return Err(self.error("arithmetic is not allowed"));
            }
        };
        Ok(Number::Float(value))
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// A borrowed view of a [`Value`] or [`Key`], whichever is being read.
#[derive(Clone, Copy)]
enum Content<'a> {
    Number(Number),
    Str(&'a str),
    Bool(bool),
    Function,
    Table(TableId),
}

impl<'a> From<&'a Value> for Content<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Number(n) => Content::Number(*n),
            Value::String(s) => Content::Str(s),
            Value::Bool(b) => Content::Bool(*b),
            Value::Function => Content::Function,
            Value::Table(id) => Content::Table(*id),
        }
    }
}

impl<'a> From<&'a Key> for Content<'a> {
    fn from(key: &'a Key) -> Self {
        match key {
            Key::Number(n) => Content::Number(*n),
            Key::String(s) => Content::Str(s),
            Key::Bool(b) => Content::Bool(*b),
            Key::Table(id) => Content::Table(*id),
        }
    }
}

impl Content<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Content::Number(Number::Integer(_)) => "integer",
            Content::Number(Number::Float(_)) => "float",
            Content::Str(_) => "string",
            Content::Bool(_) => "boolean",
            Content::Function => "function",
            Content::Table(_) => "table",
        }
    }
}

/// Drives `T: Deserialize` from a value stored in an [`Arena`].
///
/// An absent value (`None`) reads as unit or `None`. Self-describing targets
/// see a table whose keys are exactly `1..=n` as a sequence and any other
/// table as a map. Sequence targets also accept tables with holes, as long as
/// there are not many more holes than entries; a hole reads as `None`.
/// Nesting is bounded by [`Options::recursion_limit`](crate::Options).
///
/// ```rust
/// use serde::Deserialize;
/// use serde_tablit::{decode, Arena, Options, ValueDeserializer};
///
/// let mut arena = Arena::new();
/// let value = decode("{1,nil,3}", &mut arena).unwrap();
///
/// let options = Options::default();
/// let items =
///     Vec::<Option<i32>>::deserialize(ValueDeserializer::new(&arena, Some(&value), &options))
///         .unwrap();
/// assert_eq!(items, vec![Some(1), None, Some(3)]);
/// ```
pub struct ValueDeserializer<'a> {
    arena: &'a Arena,
    content: Option<Content<'a>>,
    depth: usize,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(arena: &'a Arena, value: Option<&'a Value>, options: &Options) -> Self {
        ValueDeserializer {
            arena,
            content: value.map(Content::from),
            depth: options.recursion_limit,
        }
    }

    fn with(arena: &'a Arena, content: Option<Content<'a>>, depth: usize) -> Self {
        ValueDeserializer {
            arena,
            content,
            depth,
        }
    }

    /// Resolves a table and the depth budget left for its children.
    fn enter(&self, id: TableId) -> Result<(&'a Table, usize)> {
        let depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| Error::custom("recursion limit exceeded"))?;
        let table = self
            .arena
            .get(id)
            .ok_or_else(|| Error::custom(format!("table {id} is not in the arena")))?;
        Ok((table, depth))
    }

    fn mismatch(&self, expected: &str) -> Error {
        let found = self.content.map_or("nil", |c| c.kind());
        Error::type_mismatch(expected, found)
    }

    fn seq(&self, table: &'a Table, depth: usize) -> SeqDeserializer<'a> {
        SeqDeserializer {
            arena: self.arena,
            table,
            next: 1,
            last: table.max_index(),
            depth,
        }
    }

    fn map(&self, table: &'a Table, depth: usize) -> MapDeserializer<'a> {
        MapDeserializer {
            arena: self.arena,
            iter: table.iter(),
            value: None,
            depth,
        }
    }
}

/// Holes a sequence may carry on top of one per entry.
const SEQUENCE_SLACK: i64 = 64;

/// A table reads as a sequence when every key is a positive integer and the
/// holes stay within one per entry plus [`SEQUENCE_SLACK`].
fn is_sequence_like(table: &Table) -> bool {
    let len = table.len() as i64;
    table
        .keys()
        .all(|k| matches!(k.as_index(), Some(i) if i >= 1))
        && table.max_index() <= len.saturating_mul(2).saturating_add(SEQUENCE_SLACK)
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            None => visitor.visit_unit(),
            Some(Content::Bool(b)) => visitor.visit_bool(b),
            Some(Content::Number(Number::Integer(i))) => visitor.visit_i64(i),
            Some(Content::Number(Number::Float(f))) => visitor.visit_f64(f),
            Some(Content::Str(s)) => visitor.visit_str(s),
            Some(Content::Function) => Err(Error::unsupported_type("function")),
            Some(Content::Table(id)) => {
                let (table, depth) = self.enter(id)?;
                if table.is_sequence() {
                    visitor.visit_seq(self.seq(table, depth))
                } else {
                    visitor.visit_map(self.map(table, depth))
                }
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            None => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            None => visitor.visit_unit(),
            Some(_) => Err(self.mismatch("nil")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            Some(Content::Table(id)) => {
                let (table, depth) = self.enter(id)?;
                if !is_sequence_like(table) {
                    return Err(Error::type_mismatch("sequence", "table with keyed entries"));
                }
                visitor.visit_seq(self.seq(table, depth))
            }
            _ => Err(self.mismatch("sequence")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            Some(Content::Table(id)) => {
                let (table, depth) = self.enter(id)?;
                visitor.visit_map(self.map(table, depth))
            }
            _ => Err(self.mismatch("table")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.content {
            Some(Content::Str(variant)) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: ValueDeserializer::with(self.arena, None, self.depth),
            }),
            Some(Content::Table(id)) => {
                let (table, depth) = self.enter(id)?;
                let mut entries = table.iter();
                match (entries.next(), entries.next()) {
                    (Some((Key::String(variant), value)), None) => {
                        visitor.visit_enum(EnumDeserializer {
                            variant,
                            value: ValueDeserializer::with(
                                self.arena,
                                Some(Content::from(value)),
                                depth,
                            ),
                        })
                    }
                    _ => Err(Error::type_mismatch("enum variant", "table")),
                }
            }
            _ => Err(self.mismatch("enum")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf identifier
    }
}

struct SeqDeserializer<'a> {
    arena: &'a Arena,
    table: &'a Table,
    next: i64,
    last: i64,
    depth: usize,
}

impl<'de, 'a> de::SeqAccess<'de> for SeqDeserializer<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.next > self.last {
            return Ok(None);
        }
        let content = self.table.get(self.next).map(Content::from);
        self.next += 1;
        seed.deserialize(ValueDeserializer::with(self.arena, content, self.depth))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        usize::try_from(self.last - self.next + 1).ok()
    }
}

struct MapDeserializer<'a> {
    arena: &'a Arena,
    iter: indexmap::map::Iter<'a, Key, Value>,
    value: Option<&'a Value>,
    depth: usize,
}

impl<'de, 'a> de::MapAccess<'de> for MapDeserializer<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let content = Some(Content::from(key));
                seed.deserialize(ValueDeserializer::with(self.arena, content, self.depth))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::with(
                self.arena,
                Some(Content::from(value)),
                self.depth,
            )),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'a> {
    variant: &'a str,
    value: ValueDeserializer<'a>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumDeserializer<'a> {
    type Error = Error;
    type Variant = ValueDeserializer<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name = ValueDeserializer::with(
            self.value.arena,
            Some(Content::Str(self.variant)),
            self.value.depth,
        );
        let variant = seed.deserialize(name)?;
        Ok((variant, self.value))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.content {
            None => Ok(()),
            Some(_) => Err(self.mismatch("unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        // A newtype variant around an absent value is written as the bare name.
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}
