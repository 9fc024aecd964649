//! Tablit encoding.
//!
//! This module provides the [`Encoder`], which renders a [`Value`] and the
//! tables it reaches as tablit text, and [`ValueSerializer`], which turns any
//! `T: Serialize` into values stored in an [`Arena`].
//!
//! ## Overview
//!
//! For every table the encoder:
//!
//! - **Deduplicates**: a table already emitted in this call is left out, and
//!   the entry that referenced it is dropped (a positional one becomes a hole)
//! - **Splits**: picks the index `N` up to which integer keys are cheaper to
//!   write positionally, holes included (see [`split_point`])
//! - **Emits**: positions `1..=N` in order, then every other entry keyed
//!
//! Tables are walked with an explicit stack, so nesting depth is bounded only
//! by memory.
//!
//! ```rust
//! use serde_tablit::{encode, Arena, Table, Value};
//!
//! let mut arena = Arena::new();
//! let mut table = Table::new();
//! for (i, v) in [(1, 1), (2, 2), (3, 3), (11, 100)] {
//!     table.insert(i, Value::from(v));
//! }
//! let value = Value::Table(arena.insert(table));
//!
//! // Seven holes would cost more than the `[11]=` they save.
//! assert_eq!(encode(&arena, &value), "{1,2,3,[11]=100}");
//! ```

use crate::arena::TableId;
use crate::grammar::{self, FIRST_WINDOW, PAD_COST};
use crate::{Arena, Error, Key, Number, Options, Result, Table, Value};
use serde::{ser, Serialize};
use std::collections::HashSet;

/// Renders values as tablit text.
///
/// An encoder owns the visited set of one encoding call; [`Encoder::encode`]
/// consumes it.
pub struct Encoder<'a> {
    arena: &'a Arena,
    options: &'a Options,
    visited: HashSet<TableId>,
    /// Visit order, so a dropped entry can give back the tables it claimed.
    claimed: Vec<TableId>,
}

enum Slot<'a> {
    Hole,
    Positional(&'a Value),
    Keyed(&'a Key, &'a Value),
}

/// What the parent still owes once a child table is closed.
enum Pending<'a> {
    Root,
    Nothing,
    /// The child was a key: its value comes next. `mark` is where the entry
    /// started in the output and `claim` the visit count at that point, for
    /// rolling it back.
    Key {
        value: &'a Value,
        mark: usize,
        claim: usize,
    },
}

enum Step<'a> {
    Done,
    Descend(Frame<'a>),
    Dropped,
}

struct Frame<'a> {
    slots: std::vec::IntoIter<Slot<'a>>,
    entries: usize,
    holes: usize,
    pending: Pending<'a>,
}

impl<'a> Frame<'a> {
    fn separate(&mut self, out: &mut String) {
        if self.entries > 0 {
            out.push(grammar::SEPARATOR);
        }
        self.entries += 1;
    }

    /// Holes are written lazily so trailing ones never reach the output.
    fn begin_positional(&mut self, out: &mut String) {
        for _ in 0..std::mem::take(&mut self.holes) {
            self.separate(out);
            out.push_str(grammar::NIL);
        }
        self.separate(out);
    }

    fn begin_keyed(&mut self, out: &mut String) {
        self.holes = 0;
        self.separate(out);
    }
}

impl<'a> Encoder<'a> {
    pub fn new(arena: &'a Arena, options: &'a Options) -> Self {
        Encoder {
            arena,
            options,
            visited: HashSet::new(),
            claimed: Vec::new(),
        }
    }

    /// Renders `value`. Never fails.
    ///
    /// A root table id that does not belong to the arena renders as `nil`.
    pub fn encode(mut self, value: &'a Value) -> String {
        let mut out = String::with_capacity(256);
        let id = match value {
            Value::Table(id) => *id,
            leaf => {
                write_leaf(&mut out, leaf);
                return out;
            }
        };
        let Some(root) = self.open(&mut out, id, Pending::Root) else {
            return grammar::NIL.to_string();
        };

        let mut stack = vec![root];
        while let Some(frame) = stack.last_mut() {
            let child = match frame.slots.next() {
                Some(slot) => self.step(&mut out, frame, slot),
                None => {
                    out.push('}');
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    match stack.last_mut() {
                        Some(parent) => self.resume(&mut out, parent, done.pending),
                        None => break,
                    }
                }
            };
            if let Some(child) = child {
                stack.push(child);
            }
        }
        out
    }

    /// Marks `id` visited, opens it in the output and lays out its entries.
    /// Returns `None` if the table was already emitted in this call.
    fn open(
        &mut self,
        out: &mut String,
        id: TableId,
        pending: Pending<'a>,
    ) -> Option<Frame<'a>> {
        if !self.visited.insert(id) {
            tracing::trace!(table = %id, "dropping repeated table");
            return None;
        }
        self.claimed.push(id);
        let table = self.arena.get(id)?;
        let split = split_point(table);
        tracing::trace!(table = %id, split, entries = table.len(), "positional split");

        let mut slots = Vec::with_capacity(table.len() + split as usize);
        for index in 1..=split {
            slots.push(match table.get(index) {
                Some(value) => Slot::Positional(value),
                None => Slot::Hole,
            });
        }
        for (key, value) in table.iter() {
            if matches!(key.as_index(), Some(i) if (1..=split).contains(&i)) {
                continue;
            }
            slots.push(Slot::Keyed(key, value));
        }

        out.push('{');
        Some(Frame {
            slots: slots.into_iter(),
            entries: 0,
            holes: 0,
            pending,
        })
    }

    fn step(
        &mut self,
        out: &mut String,
        frame: &mut Frame<'a>,
        slot: Slot<'a>,
    ) -> Option<Frame<'a>> {
        match slot {
            Slot::Hole => {
                frame.holes += 1;
                None
            }
            Slot::Positional(value) => {
                let mark = out.len();
                let holes = frame.holes;
                frame.begin_positional(out);
                match self.write_value(out, value, Pending::Nothing) {
                    Step::Done => None,
                    Step::Descend(child) => Some(child),
                    Step::Dropped => {
                        // A repeated table leaves a hole so later indexes keep their place.
                        out.truncate(mark);
                        frame.entries -= holes + 1;
                        frame.holes = holes + 1;
                        None
                    }
                }
            }
            Slot::Keyed(key, value) => {
                let mark = out.len();
                let claim = self.claimed.len();
                frame.begin_keyed(out);
                let step = match key {
                    Key::Table(id) => {
                        out.push('[');
                        match self.open(out, *id, Pending::Key { value, mark, claim }) {
                            Some(child) => Step::Descend(child),
                            None => Step::Dropped,
                        }
                    }
                    Key::String(name)
                        if self.options.bare_keys && grammar::is_bare_identifier(name) =>
                    {
                        out.push_str(name);
                        out.push('=');
                        self.write_value(out, value, Pending::Nothing)
                    }
                    key => {
                        out.push('[');
                        write_key(out, key);
                        out.push_str("]=");
                        self.write_value(out, value, Pending::Nothing)
                    }
                };
                self.settle(out, frame, step, mark, claim)
            }
        }
    }

    fn resume(
        &mut self,
        out: &mut String,
        parent: &mut Frame<'a>,
        pending: Pending<'a>,
    ) -> Option<Frame<'a>> {
        match pending {
            Pending::Root | Pending::Nothing => None,
            Pending::Key { value, mark, claim } => {
                out.push_str("]=");
                let step = self.write_value(out, value, Pending::Nothing);
                self.settle(out, parent, step, mark, claim)
            }
        }
    }

    /// Applies the outcome of a keyed entry. A dropped entry is cut from the
    /// output and every table it claimed becomes unvisited again.
    fn settle(
        &mut self,
        out: &mut String,
        frame: &mut Frame<'a>,
        step: Step<'a>,
        mark: usize,
        claim: usize,
    ) -> Option<Frame<'a>> {
        match step {
            Step::Done => None,
            Step::Descend(child) => Some(child),
            Step::Dropped => {
                out.truncate(mark);
                frame.entries -= 1;
                for id in self.claimed.drain(claim..) {
                    self.visited.remove(&id);
                }
                None
            }
        }
    }

    fn write_value(
        &mut self,
        out: &mut String,
        value: &'a Value,
        pending: Pending<'a>,
    ) -> Step<'a> {
        match value {
            Value::Table(id) => match self.open(out, *id, pending) {
                Some(child) => Step::Descend(child),
                None => Step::Dropped,
            },
            leaf => {
                write_leaf(out, leaf);
                Step::Done
            }
        }
    }
}


/// Chooses how many leading integer indexes of `table` to write positionally.
///
/// Scans indexes 1, 2, 3, … in windows ending at 10, 100, 1000, …. A hole
/// adds [`PAD_COST`] to the running pad, a present index adds its
/// [`keyed_cost`](grammar::keyed_cost) to the running savings; whenever the
/// savings exceed the pad the split moves to the current index and both
/// totals reset. The scan stops after a window without a move, or past the
/// largest positive integer key.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{ser::split_point, Table, Value};
///
/// let mut table = Table::new();
/// table.insert(1, Value::from("a"));
/// table.insert(3, Value::from("c"));
/// table.insert(4, Value::from("d"));
/// assert_eq!(split_point(&table), 4);
///
/// table.insert(10_000, Value::from("far"));
/// assert_eq!(split_point(&table), 4);
/// ```
#[must_use]
pub fn split_point(table: &Table) -> i64 {
    let last = table.max_index();
    let mut split = 0;
    let mut pad = 0usize;
    let mut saved = 0usize;
    let mut index = 1i64;
    let mut window = FIRST_WINDOW;

    loop {
        let bound = window.min(last);
        let mut moved = false;
        while index <= bound {
            if table.has_index(index) {
                saved += grammar::keyed_cost(index);
            } else {
                pad += PAD_COST;
            }
            if saved > pad {
                split = index;
                pad = 0;
                saved = 0;
                moved = true;
            }
            index += 1;
        }
        if !moved || index > last {
            return split;
        }
        window = window.saturating_mul(10);
    }
}

fn write_leaf(out: &mut String, value: &Value) {
    match value {
        Value::Number(n) => write_number(out, n),
        Value::String(s) => grammar::write_quoted(out, s),
        Value::Bool(b) => out.push_str(bool_token(*b)),
        Value::Function => out.push_str(grammar::FUNCTION_PLACEHOLDER),
        // Tables go through `Encoder::open`.
        Value::Table(_) => out.push_str(grammar::NIL),
    }
}

fn write_key(out: &mut String, key: &Key) {
    match key {
        Key::Number(n) => write_number(out, n),
        Key::String(s) => grammar::write_quoted(out, s),
        Key::Bool(b) => out.push_str(bool_token(*b)),
        Key::Table(_) => out.push_str(grammar::NIL),
    }
}

fn write_number(out: &mut String, number: &Number) {
    match number {
        Number::Integer(i) => out.push_str(&i.to_string()),
        Number::Float(f) => {
            // Writing to a String cannot fail.
            let _ = grammar::write_float(out, *f);
        }
    }
}

const fn bool_token(b: bool) -> &'static str {
    if b {
        grammar::TRUE
    } else {
        grammar::FALSE
    }
}

/// Converts any `T: Serialize` into a [`Value`] stored in an [`Arena`].
///
/// Sequences and tuples become positional tables; maps and structs become
/// keyed tables. `None`, `()` and unit structs produce no value: they leave a
/// hole in a sequence, drop a struct field or map entry, and yield `Ok(None)`
/// at the top level. Unit variants become their name; other variants become
/// a one-entry table `{Variant=…}`.
///
/// ```rust
/// use serde::Serialize;
/// use serde_tablit::{encode, Arena, ValueSerializer};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: Option<i32> }
///
/// let mut arena = Arena::new();
/// let value = Point { x: 1, y: None }
///     .serialize(ValueSerializer::new(&mut arena))
///     .unwrap()
///     .unwrap();
/// assert_eq!(encode(&arena, &value), "{x=1}");
/// ```
pub struct ValueSerializer<'a> {
    arena: &'a mut Arena,
}

impl<'a> ValueSerializer<'a> {
    pub fn new(arena: &'a mut Arena) -> Self {
        ValueSerializer { arena }
    }
}

impl<'a> ser::Serializer for ValueSerializer<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    type SerializeSeq = SerializeTable<'a>;
    type SerializeTuple = SerializeTable<'a>;
    type SerializeTupleStruct = SerializeTable<'a>;
    type SerializeTupleVariant = SerializeVariant<'a>;
    type SerializeMap = SerializeMap<'a>;
    type SerializeStruct = SerializeMap<'a>;
    type SerializeStructVariant = SerializeVariant<'a>;

    fn serialize_bool(self, v: bool) -> Result<Option<Value>> {
        Ok(Some(Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Value>> {
        Ok(Some(Value::Number(Number::Integer(v))))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Value>> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Value>> {
        if v <= i64::MAX as u64 {
            self.serialize_i64(v as i64)
        } else {
            Ok(Some(Value::Number(Number::Float(v as f64))))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Value>> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Value>> {
        Ok(Some(Value::Number(Number::Float(v))))
    }

    fn serialize_char(self, v: char) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<Value>> {
        let table: Table = v.iter().map(|b| Value::from(*b as i64)).collect();
        Ok(Some(Value::Table(self.arena.insert(table))))
    }

    fn serialize_none(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Value>> {
        Ok(Some(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(ValueSerializer::new(&mut *self.arena))?;
        let Some(inner) = inner else {
            return Ok(Some(Value::String(variant.to_string())));
        };
        let mut table = Table::with_capacity(1);
        table.insert(variant, inner);
        Ok(Some(Value::Table(self.arena.insert(table))))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeTable<'a>> {
        Ok(SerializeTable::new(self.arena, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeTable<'a>> {
        Ok(SerializeTable::new(self.arena, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeTable<'a>> {
        Ok(SerializeTable::new(self.arena, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<'a>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeTable::new(self.arena, len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap<'a>> {
        Ok(SerializeMap {
            arena: self.arena,
            table: Table::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<'a>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeTable::new(self.arena, len),
        })
    }
}

pub struct SerializeTable<'a> {
    arena: &'a mut Arena,
    table: Table,
    next: i64,
}

impl<'a> SerializeTable<'a> {
    fn new(arena: &'a mut Arena, len: usize) -> Self {
        SerializeTable {
            arena,
            table: Table::with_capacity(len),
            next: 1,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // An absent element still takes its index, leaving a hole.
        if let Some(value) = value.serialize(ValueSerializer::new(&mut *self.arena))? {
            self.table.insert(self.next, value);
        }
        self.next += 1;
        Ok(())
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = value.serialize(ValueSerializer::new(&mut *self.arena))? {
            self.table.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> (&'a mut Arena, TableId) {
        let id = self.arena.insert(self.table);
        (self.arena, id)
    }
}

impl<'a> ser::SerializeSeq for SerializeTable<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Table(self.finish().1)))
    }
}

impl<'a> ser::SerializeTuple for SerializeTable<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Table(self.finish().1)))
    }
}

impl<'a> ser::SerializeTupleStruct for SerializeTable<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Table(self.finish().1)))
    }
}

/// Collects a tuple or struct variant and wraps it as `{Variant=…}`.
pub struct SerializeVariant<'a> {
    variant: &'static str,
    inner: SerializeTable<'a>,
}

impl<'a> SerializeVariant<'a> {
    fn finish(self) -> Option<Value> {
        let (arena, inner) = self.inner.finish();
        let mut outer = Table::with_capacity(1);
        outer.insert(self.variant, Value::Table(inner));
        Some(Value::Table(arena.insert(outer)))
    }
}

impl<'a> ser::SerializeTupleVariant for SerializeVariant<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(self.finish())
    }
}

impl<'a> ser::SerializeStructVariant for SerializeVariant<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.field(key, value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(self.finish())
    }
}

pub struct SerializeMap<'a> {
    arena: &'a mut Arena,
    table: Table,
    next_key: Option<Key>,
}

impl<'a> ser::SerializeMap for SerializeMap<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = key
            .serialize(ValueSerializer::new(&mut *self.arena))?
            .ok_or_else(|| Error::unsupported_type("map key without a value"))?;
        self.next_key = Some(Key::try_from(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        if let Some(value) = value.serialize(ValueSerializer::new(&mut *self.arena))? {
            self.table.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Table(self.arena.insert(self.table))))
    }
}

impl<'a> ser::SerializeStruct for SerializeMap<'a> {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = value.serialize(ValueSerializer::new(&mut *self.arena))? {
            self.table.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Table(self.arena.insert(self.table))))
    }
}

/// Serializes `value` into `arena`; see [`ValueSerializer`].
pub(crate) fn to_arena_value<T>(arena: &mut Arena, value: &T) -> Result<Option<Value>>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer::new(arena))
}
