//! Table storage and identity.
//!
//! Every table lives in an [`Arena`] and is addressed by a [`TableId`]. The
//! id is the table's identity: the encoder's visited set holds ids, so a
//! table stored under two keys (or inside itself) is recognized as the same
//! instance without comparing contents.
//!
//! ```rust
//! use serde_tablit::{encode, Arena, Table, Value};
//!
//! let mut arena = Arena::new();
//! let shared = arena.insert(Table::from_iter([Value::from(1)]));
//!
//! let mut root = Table::new();
//! root.insert("a", Value::Table(shared));
//! root.insert("b", Value::Table(shared));
//! let root = Value::Table(arena.insert(root));
//!
//! // The second reference to the shared table is dropped.
//! assert_eq!(encode(&arena, &root), "{a={1}}");
//! ```

use crate::{Key, Table, Value};
use std::collections::HashSet;
use std::fmt;

/// Index of a table inside its [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(usize);

impl TableId {
    /// Position of the table in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of all tables reachable from a set of values.
///
/// Ids are only meaningful for the arena that issued them. A dangling id
/// (one from another arena, or removed by [`Arena::truncate`]) is treated as
/// an already-emitted table by the encoder and as an error by the Serde bridge.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    tables: Vec<Table>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Arena { tables: Vec::new() }
    }

    /// Moves `table` into the arena and returns its id.
    pub fn insert(&mut self, table: Table) -> TableId {
        self.tables.push(table);
        TableId(self.tables.len() - 1)
    }

    /// Returns the table for `id`.
    #[must_use]
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    /// Returns the table for `id` mutably, e.g. to close a cycle after insertion.
    ///
    /// ```rust
    /// use serde_tablit::{encode, Arena, Table, Value};
    ///
    /// let mut arena = Arena::new();
    /// let id = arena.insert(Table::new());
    /// if let Some(table) = arena.get_mut(id) {
    ///     table.insert("me", Value::Table(id));
    ///     table.insert("n", Value::from(1));
    /// }
    /// assert_eq!(encode(&arena, &Value::Table(id)), "{n=1}");
    /// ```
    pub fn get_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0)
    }

    /// Number of tables in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if the arena holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drops every table allocated after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.tables.truncate(len);
    }

    /// Deep comparison of `a` (in `self`) with `b` (in `other`).
    ///
    /// Tables compare by contents, ignoring entry order; table keys are
    /// matched by contents too. A pair of tables already under comparison is
    /// assumed equal, so cyclic structures terminate.
    ///
    /// ```rust
    /// use serde_tablit::{decode, encode, table, Arena};
    ///
    /// let mut arena = Arena::new();
    /// let value = table!(arena, { "xs" => table!(arena, [1, 2]), 1 => "one" });
    ///
    /// let mut decoded_arena = Arena::new();
    /// let decoded = decode(&encode(&arena, &value), &mut decoded_arena).unwrap();
    /// assert!(arena.structural_eq(&value, &decoded_arena, &decoded));
    /// ```
    #[must_use]
    pub fn structural_eq(&self, a: &Value, other: &Arena, b: &Value) -> bool {
        let mut assumed = HashSet::new();
        values_eq(self, a, other, b, &mut assumed)
    }
}

fn values_eq(
    left: &Arena,
    a: &Value,
    right: &Arena,
    b: &Value,
    assumed: &mut HashSet<(TableId, TableId)>,
) -> bool {
    match (a, b) {
        (Value::Table(x), Value::Table(y)) => tables_eq(left, *x, right, *y, assumed),
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Function, Value::Function) => true,
        _ => false,
    }
}

fn tables_eq(
    left: &Arena,
    x: TableId,
    right: &Arena,
    y: TableId,
    assumed: &mut HashSet<(TableId, TableId)>,
) -> bool {
    if !assumed.insert((x, y)) {
        return true;
    }
    let (Some(tx), Some(ty)) = (left.get(x), right.get(y)) else {
        return false;
    };
    if tx.len() != ty.len() {
        return false;
    }

    // Each table key on the right pairs with at most one on the left.
    let mut paired = HashSet::new();
    for (key, value) in tx.iter() {
        let matched = match key {
            // Candidate matches are tried on a copy so a failed attempt
            // leaves no assumptions behind.
            Key::Table(kx) => ty.iter().any(|(other_key, other_value)| {
                let Key::Table(ky) = other_key else {
                    return false;
                };
                if paired.contains(ky) {
                    return false;
                }
                let mut trial = assumed.clone();
                let ok = tables_eq(left, *kx, right, *ky, &mut trial)
                    && values_eq(left, value, right, other_value, &mut trial);
                if ok {
                    *assumed = trial;
                    paired.insert(*ky);
                }
                ok
            }),
            _ => ty
                .get(key.clone())
                .is_some_and(|other| values_eq(left, value, right, other, assumed)),
        };
        if !matched {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert(Table::new());
        let b = arena.insert(Table::new());
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert!(arena.get(b).is_some());

        arena.truncate(1);
        assert!(arena.get(b).is_none());
    }

    #[test]
    fn test_structural_eq_across_arenas() {
        let mut left = Arena::new();
        let inner = left.insert(Table::from_iter([Value::from("x")]));
        let mut outer = Table::new();
        outer.insert("inner", Value::Table(inner));
        outer.insert(1, Value::from(2.5));
        let a = Value::Table(left.insert(outer));

        let mut right = Arena::new();
        let _padding = right.insert(Table::new());
        let inner = right.insert(Table::from_iter([Value::from("x")]));
        let mut outer = Table::new();
        outer.insert(1, Value::from(2.5));
        outer.insert("inner", Value::Table(inner));
        let b = Value::Table(right.insert(outer));

        assert!(left.structural_eq(&a, &right, &b));
    }

    #[test]
    fn test_structural_eq_detects_difference() {
        let mut arena = Arena::new();
        let a = Value::Table(arena.insert(Table::from_iter([Value::from(1)])));
        let b = Value::Table(arena.insert(Table::from_iter([Value::from(1.0)])));
        assert!(!arena.structural_eq(&a, &arena, &b));
    }

    #[test]
    fn test_structural_eq_table_keys() {
        let mut arena = Arena::new();
        let k1 = arena.insert(Table::from_iter([Value::from("k")]));
        let k2 = arena.insert(Table::from_iter([Value::from("k")]));
        let mut t1 = Table::new();
        t1.insert(k1, Value::from(true));
        let mut t2 = Table::new();
        t2.insert(k2, Value::from(true));
        let a = Value::Table(arena.insert(t1));
        let b = Value::Table(arena.insert(t2));
        assert!(arena.structural_eq(&a, &arena, &b));
    }

    #[test]
    fn test_structural_eq_pairs_table_keys_once() {
        fn key(arena: &mut Arena, text: &str) -> Key {
            Key::Table(arena.insert(Table::from_iter([Value::from(text)])))
        }

        let mut arena = Arena::new();
        let (a, b) = (key(&mut arena, "k"), key(&mut arena, "k"));
        let (c, d) = (key(&mut arena, "k"), key(&mut arena, "other"));

        let left: Table = [(a, Value::from(1)), (b, Value::from(1))].into_iter().collect();
        let right: Table = [(c, Value::from(1)), (d, Value::from(1))].into_iter().collect();
        let left = Value::Table(arena.insert(left));
        let right = Value::Table(arena.insert(right));

        assert!(!arena.structural_eq(&left, &arena, &right));
        assert!(!arena.structural_eq(&right, &arena, &left));
    }

    #[test]
    fn test_structural_eq_cycles_terminate() {
        let mut arena = Arena::new();
        let a = arena.insert(Table::new());
        let b = arena.insert(Table::new());
        if let Some(t) = arena.get_mut(a) {
            t.insert("self", Value::Table(a));
        }
        if let Some(t) = arena.get_mut(b) {
            t.insert("self", Value::Table(b));
        }
        assert!(arena.structural_eq(&Value::Table(a), &arena, &Value::Table(b)));
    }
}
