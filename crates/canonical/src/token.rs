use serde::{Deserialize, Serialize};

/// A normalized word with the character offsets of its surface form.
///
/// Offsets count `char`s, not bytes, and point into the raw document given
/// to [`canonicalize`](crate::canonicalize).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Index of this token in the unfiltered token sequence.
    pub position: usize,
    /// Char offset (inclusive) of the surface word.
    pub start: usize,
    /// Char offset (exclusive) of the surface word.
    pub end: usize,
}

impl Token {
    /// Number of characters in the normalized text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}
