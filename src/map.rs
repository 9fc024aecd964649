//! Ordered table type.
//!
//! [`Table`] wraps an [`IndexMap`] so entries keep insertion order. The
//! encoder writes keyed entries in that order, which makes output
//! deterministic and lets a decoded table re-encode to identical text.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tablit::{Table, Value};
//!
//! let mut table = Table::new();
//! table.push(Value::from("first"));
//! table.push(Value::from("second"));
//! table.insert("name", Value::from("list"));
//!
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.get(2).and_then(|v| v.as_str()), Some("second"));
//! assert_eq!(table.border(), 2);
//! ```

use crate::{Key, Value};
use indexmap::IndexMap;

/// An insertion-ordered mapping from [`Key`] to [`Value`].
///
/// Keys are normalized on insert and lookup (see [`Key::normalized`]).
/// Equality is map equality: two tables with the same entries in a different
/// order are equal. Table-valued entries compare by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: IndexMap<Key, Value>,
    /// Cached [`Table::border`]; it depends only on the keys.
    border: i64,
}

impl Table {
    /// Creates an empty `Table`.
    #[must_use]
    pub fn new() -> Self {
        Table::default()
    }

    /// Creates an empty `Table` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            entries: IndexMap::with_capacity(capacity),
            border: 0,
        }
    }

    /// Inserts a key-value pair, returning the previous value for that key.
    ///
    /// An existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        let key = key.into().normalized();
        let extends = key.as_index() == Some(self.border + 1);
        let previous = self.entries.insert(key, value);
        if extends {
            while self.has_index(self.border + 1) {
                self.border += 1;
            }
        }
        previous
    }

    /// Appends `value` at index `border() + 1`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tablit::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.push(Value::from(10));
    /// table.push(Value::from(20));
    /// assert_eq!(table.get(2), Some(&Value::from(20)));
    /// ```
    pub fn push(&mut self, value: Value) {
        self.insert(self.border + 1, value);
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.entries.get(&key.into().normalized())
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        self.entries.get_mut(&key.into().normalized())
    }

    /// Removes `key`, returning its value. Order of the other entries is kept.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into().normalized();
        let removed = self.entries.shift_remove(&key);
        if removed.is_some() {
            if let Some(index) = key.as_index().filter(|i| (1..=self.border).contains(i)) {
                self.border = index - 1;
            }
        }
        removed
    }

    /// Returns `true` if the table holds an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into().normalized())
    }

    /// Returns `true` if integer key `index` is present.
    #[inline]
    #[must_use]
    pub fn has_index(&self, index: i64) -> bool {
        self.entries.contains_key(&Key::from(index))
    }

    /// Length of the dense prefix: the largest `n` such that `1..=n` are all present.
    #[must_use]
    pub fn border(&self) -> i64 {
        self.border
    }

    /// Largest positive integer key, or 0 when there is none.
    #[must_use]
    pub fn max_index(&self) -> i64 {
        self.entries
            .keys()
            .filter_map(Key::as_index)
            .filter(|i| *i > 0)
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if the keys are exactly `1..=len`.
    ///
    /// The Serde bridge reads such tables as sequences.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        let len = self.entries.len() as i64;
        self.entries
            .keys()
            .all(|k| matches!(k.as_index(), Some(i) if i >= 1 && i <= len))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.entries.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(Key, Value)> for Table {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl FromIterator<Value> for Table {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut table = Table::new();
        for (i, value) in iter.into_iter().enumerate() {
            table.insert(i as i64 + 1, value);
        }
        table
    }
}
