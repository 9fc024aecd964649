//! Range notation for lists of integers.
//!
//! [`compress`] sorts the integers of a list and writes runs of consecutive
//! values as `first~last`:
//!
//! ```rust
//! use serde_tablit::compress;
//!
//! assert_eq!(compress([1, 2, 3, 5, 7, 8, 9]), "1~3,5,7~9");
//! assert_eq!(compress([9, 8, 7]), "7~9");
//! ```

/// One element of the list handed to [`compress`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Int(i64),
    /// Anything that is not an integer; written after the integers as is.
    Other(String),
}

impl From<i64> for Item {
    fn from(value: i64) -> Self {
        Item::Int(value)
    }
}

impl From<i32> for Item {
    fn from(value: i32) -> Self {
        Item::Int(value as i64)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Item::Other(value.to_string())
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Item::Other(value)
    }
}

/// Compresses `items` into range notation.
///
/// Integers are sorted; a run of one value is written as `v`, a run of two
/// as `a,b`, and a longer run as `a~b`. Equal integers are separate values
/// and break a run. Other items follow the integers in their original
/// order. The integer part always takes the first slot, so a list without
/// integers starts with a comma.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::{compress, Item};
///
/// assert_eq!(compress([4, 5]), "4,5");
/// assert_eq!(
///     compress([Item::from(1), Item::from(2), Item::from(3), Item::from("x")]),
///     "1~3,x"
/// );
/// assert_eq!(compress(["x", "y"]), ",x,y");
/// assert_eq!(compress(Vec::<i64>::new()), "");
/// ```
pub fn compress<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Item>,
{
    let mut ints = Vec::new();
    let mut others = Vec::new();
    for item in items {
        match item.into() {
            Item::Int(i) => ints.push(i),
            Item::Other(s) => others.push(s),
        }
    }
    ints.sort_unstable();

    let mut out = String::new();
    let mut runs = ints.iter().copied().peekable();
    while let Some(first) = runs.next() {
        let mut last = first;
        while let Some(&next) = runs.peek() {
            if last.checked_add(1) != Some(next) {
                break;
            }
            last = next;
            runs.next();
        }
        if !out.is_empty() {
            out.push(',');
        }
        match last.abs_diff(first) {
            0 => out.push_str(&first.to_string()),
            1 => out.push_str(&format!("{first},{last}")),
            _ => out.push_str(&format!("{first}~{last}")),
        }
    }

    for other in others {
        out.push(',');
        out.push_str(&other);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs() {
        assert_eq!(compress([1, 2, 3, 5, 7, 8, 9]), "1~3,5,7~9");
        assert_eq!(compress([4, 5]), "4,5");
        assert_eq!(compress([42]), "42");
        assert_eq!(compress([10, 1, 3, 2]), "1~3,10");
    }

    #[test]
    fn test_empty() {
        assert_eq!(compress(Vec::<i64>::new()), "");
    }

    #[test]
    fn test_others_follow_integers() {
        let items = vec![
            Item::from("x"),
            Item::from(2),
            Item::from(1),
            Item::from("y"),
            Item::from(3),
        ];
        assert_eq!(compress(items), "1~3,x,y");
    }

    #[test]
    fn test_no_integers_keeps_leading_slot() {
        assert_eq!(compress(["x"]), ",x");
    }

    #[test]
    fn test_duplicates_break_runs() {
        assert_eq!(compress([1, 1, 2, 3]), "1,1~3");
        assert_eq!(compress([5, 5]), "5,5");
    }

    #[test]
    fn test_negative_and_extreme_values() {
        assert_eq!(compress([-2, -1, 0, 1]), "-2~1");
        assert_eq!(compress([i64::MAX - 1, i64::MAX]), format!("{},{}", i64::MAX - 1, i64::MAX));
        assert_eq!(compress([i64::MIN, i64::MAX]), format!("{},{}", i64::MIN, i64::MAX));
    }
}
