//! Configuration options for tablit encoding and decoding.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tablit::{encode_with_options, table, Arena, Options};
//!
//! let mut arena = Arena::new();
//! let value = table!(arena, { "name" => "Alice" });
//!
//! assert_eq!(
//!     encode_with_options(&arena, &value, &Options::new()),
//!     r#"{name="Alice"}"#
//! );
//! assert_eq!(
//!     encode_with_options(&arena, &value, &Options::new().with_bare_keys(false)),
//!     r#"{["name"]="Alice"}"#
//! );
//! ```

/// Default nesting limit for the parser and the Serde bridge.
pub const DEFAULT_RECURSION_LIMIT: usize = 200;

/// Configuration options for tablit encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use serde_tablit::Options;
///
/// let options = Options::new().with_recursion_limit(64);
/// assert_eq!(options.recursion_limit, 64);
/// assert!(options.bare_keys);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum table nesting accepted when parsing or deserializing.
    pub recursion_limit: usize,
    /// Write identifier-like string keys as `name=value` instead of `["name"]=value`.
    pub bare_keys: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            bare_keys: true,
        }
    }
}

impl Options {
    /// Creates default options (bare keys on, recursion limit of 200).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth accepted by the parser.
    ///
    /// Encoding is not affected: the encoder walks tables with an explicit
    /// stack and accepts any depth.
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Enables or disables bare identifier keys.
    #[must_use]
    pub fn with_bare_keys(mut self, bare_keys: bool) -> Self {
        self.bare_keys = bare_keys;
        self
    }
}
