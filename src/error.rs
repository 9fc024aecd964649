//! Error types for tablit parsing and Serde bridging.
//!
//! Encoding never fails and [`decode`](crate::decode) collapses every failure
//! into `None`, so these errors surface only through the diagnostic entry
//! points: [`Parser::parse`](crate::Parser::parse), [`from_str`](crate::from_str)
//! and the Serde conversions.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tablit::{Arena, Error, Options, Parser};
//!
//! let mut arena = Arena::new();
//! let err = Parser::new("{1,2", &mut arena, &Options::default())
//!     .parse()
//!     .unwrap_err();
//! assert!(matches!(err, Error::UnexpectedEof { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing tablit text or
/// converting between tablit values and Rust types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed or disallowed input
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Input ended in the middle of a value
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Tables nested deeper than the configured limit
    #[error("Recursion limit of {limit} exceeded at line {line}, column {col}")]
    RecursionLimit {
        line: usize,
        col: usize,
        limit: usize,
    },

    /// Type mismatch while driving a Rust type from a value
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A Rust value that has no tablit representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tablit::Error;
    ///
    /// let err = Error::syntax(3, 7, "unexpected identifier `os`");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates a recursion limit error.
    pub fn recursion_limit(line: usize, col: usize, limit: usize) -> Self {
        Error::RecursionLimit { line, col, limit }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tablit::Error;
    ///
    /// let err = Error::type_mismatch("integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unexpected_eof(1, 5, "'}'");
        assert_eq!(
            err.to_string(),
            "Unexpected end of input at line 1, column 5: expected '}'"
        );

        let err = Error::recursion_limit(2, 1, 200);
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_serde_custom() {
        let err = <Error as serde::de::Error>::custom("missing field `id`");
        assert_eq!(err, Error::Custom("missing field `id`".to_string()));
    }
}
