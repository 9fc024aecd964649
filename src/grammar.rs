//! The tablit text grammar shared by the encoder and the parser.
//!
//! # Overview
//!
//! A tablit document is a single literal:
//!
//! ```text
//! value      := number | string | bool | table
//! table      := '{' (entry (sep entry)* sep?)? '}'
//! entry      := value | 'nil' | '[' key ']' '=' value | name '=' value
//! sep        := ',' | ';'
//! key        := number | string | bool | table
//! bool       := 'T' | 'F'
//! ```
//!
//! Positional entries take indexes 1, 2, 3, … in order of appearance. `nil`
//! is a hole: it advances the index without storing anything.
//!
//! ```text
//! {1,2,3,[11]=100}          positional prefix, keyed tail
//! {"a",nil,"c"}             hole at index 2
//! {name="x",["2lines"]=T}   bare and bracketed keys
//! {}                        empty table
//! ```
//!
//! # Names
//!
//! The only names with a meaning are `T` (true), `F` (false) and `nil`
//! (no value). Any other bare word is rejected unless it is a key directly
//! followed by `=`. Bare keys match `[A-Za-z_][A-Za-z0-9_]*` and must not be
//! one of [`RESERVED_WORDS`].
//!
//! # Numbers
//!
//! | Value | Text |
//! |-------|------|
//! | Integer | `42`, `-7` |
//! | Float | `0.1`, `1.0`, `-2.5e-8`, `1e300` |
//! | +∞ / −∞ / NaN | `1/0`, `-1/0`, `0/0` |
//!
//! Floats always carry a fraction or an exponent so they stay floats after a
//! round trip. The parser also accepts `0x` hex integers.
//!
//! # Strings
//!
//! Double quotes on output; the parser accepts single quotes as well.
//!
//! ```text
//! \"  \\  \n  \r  \t         written and read
//! \ddd                        written for other control characters (3 digits)
//! \a \b \f \v \' \xHH \u{H}   read only
//! ```
//!
//! # Positional cost model
//!
//! Writing present index `i` keyed costs `[i]=` over the positional form,
//! i.e. [`keyed_cost`]. Covering an absent index positionally costs a hole,
//! `nil,`, i.e. [`PAD_COST`]. The encoder extends the positional span while
//! the keyed cost it saves exceeds the holes it has to pay for.

use std::fmt;

pub const TRUE: &str = "T";
pub const FALSE: &str = "F";
/// Hole marker inside a table, and the "no value" document.
pub const NIL: &str = "nil";
pub const EMPTY_TABLE: &str = "{}";
/// Written for [`Value::Function`](crate::Value::Function); never parses.
pub const FUNCTION_PLACEHOLDER: &str = "function";
pub const SEPARATOR: char = ',';

pub const POS_INFINITY: &str = "1/0";
pub const NEG_INFINITY: &str = "-1/0";
pub const NAN: &str = "0/0";

/// Cost of one hole in the positional span.
pub const PAD_COST: usize = NIL.len() + 1;

/// First window of the split scan; each following window is ten times larger.
pub const FIRST_WINDOW: i64 = 10;

/// Words that can never be written as bare keys.
pub const RESERVED_WORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Bytes saved by writing present index `index` positionally instead of as `[index]=`.
#[inline]
#[must_use]
pub fn keyed_cost(index: i64) -> usize {
    "[]=".len() + decimal_len(index)
}

fn decimal_len(n: i64) -> usize {
    let digits = n.unsigned_abs().checked_ilog10().map_or(1, |d| d as usize + 1);
    if n < 0 {
        digits + 1
    } else {
        digits
    }
}

/// Returns `true` if `s` may be written as a bare key.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::grammar::is_bare_identifier;
///
/// assert!(is_bare_identifier("valid_name"));
/// assert!(is_bare_identifier("_x9"));
/// assert!(!is_bare_identifier("2lines"));
/// assert!(!is_bare_identifier("end"));
/// assert!(!is_bare_identifier(""));
/// ```
#[must_use]
pub fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !RESERVED_WORDS.contains(&s)
}

/// Writes a float in a form that parses back to the same bits (NaN payloads aside).
pub fn write_float<W: fmt::Write>(out: &mut W, value: f64) -> fmt::Result {
    if value.is_nan() {
        out.write_str(NAN)
    } else if value.is_infinite() {
        out.write_str(if value > 0.0 { POS_INFINITY } else { NEG_INFINITY })
    } else {
        // Debug formatting is the shortest round-trip form and always
        // includes a `.` or an exponent.
        write!(out, "{:?}", value)
    }
}

/// Writes `s` as a double-quoted string literal.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::grammar::write_quoted;
///
/// let mut out = String::new();
/// write_quoted(&mut out, "say \"hi\"\n\u{1}");
/// assert_eq!(out, r#""say \"hi\"\n\001""#);
/// ```
pub fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                // Always three digits so a following digit is not absorbed.
                out.push_str(&format!("\\{:03}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_cost() {
        assert_eq!(keyed_cost(1), 4);
        assert_eq!(keyed_cost(11), 5);
        assert_eq!(keyed_cost(1000), 7);
        assert_eq!(PAD_COST, 4);
    }

    #[test]
    fn test_decimal_len() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(-10), 3);
        assert_eq!(decimal_len(i64::MIN), 20);
    }

    #[test]
    fn test_reserved_words_are_not_bare() {
        for word in RESERVED_WORDS {
            assert!(!is_bare_identifier(word), "{word}");
        }
        assert!(is_bare_identifier("T"));
        assert!(!is_bare_identifier("has space"));
        assert!(!is_bare_identifier("ünïcode"));
    }

    #[test]
    fn test_write_float() {
        let render = |v: f64| {
            let mut s = String::new();
            write_float(&mut s, v).unwrap();
            s
        };
        assert_eq!(render(1.0), "1.0");
        assert_eq!(render(0.1), "0.1");
        assert_eq!(render(1e300), "1e300");
        assert_eq!(render(f64::INFINITY), "1/0");
        assert_eq!(render(f64::NEG_INFINITY), "-1/0");
        assert_eq!(render(f64::NAN), "0/0");
    }

    #[test]
    fn test_write_quoted_escapes() {
        let mut out = String::new();
        write_quoted(&mut out, "a\\b\t\r\u{0}7\u{7f}");
        assert_eq!(out, "\"a\\\\b\\t\\r\\0007\\127\"");
    }
}
