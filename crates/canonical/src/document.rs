//! Document types for the normalization layer.
//!
//! A [`CanonicalizedDocument`] carries the normalized text together with its
//! tokens. Each token remembers where its surface word sits in the raw
//! input, which is how later stages turn a match over normalized tokens
//! back into the text a reader would recognise.
//!
//! ```rust
//! use canonical::{canonicalize, CanonicalizeConfig};
//!
//! let doc = canonicalize("doc-001", "¡Hola, Mundo!", &CanonicalizeConfig::default()).unwrap();
//! assert_eq!(doc.canonical_text, "hola mundo");
//! assert_eq!(doc.surface(0, 2), "Hola, Mundo");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::CanonicalizeConfig;
use crate::token::Token;

/// The normalized representation of one input document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizedDocument {
    /// Caller-supplied identifier, trimmed.
    pub doc_id: String,
    /// Normalized text: tokens joined by single spaces.
    pub canonical_text: String,
    /// Tokens in document order, with surface offsets into `source`.
    pub tokens: Vec<Token>,
    /// The raw input the offsets refer to.
    pub source: String,
    /// Version of the config that produced this document.
    pub canonical_version: u32,
    /// Snapshot of the config used.
    pub config: CanonicalizeConfig,
}

impl CanonicalizedDocument {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of characters in the raw input.
    pub fn source_chars(&self) -> usize {
        self.source.chars().count()
    }

    /// Raw text covering tokens `first..last` (exclusive), from the first
    /// token's surface start to the last token's surface end.
    ///
    /// Returns an empty string for an empty or out-of-range span.
    pub fn surface(&self, first: usize, last: usize) -> String {
        if first >= last || last > self.tokens.len() {
            return String::new();
        }
        self.slice_chars(self.tokens[first].start, self.tokens[last - 1].end)
    }

    /// Raw text between two char offsets, clamped to the input.
    pub fn slice_chars(&self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        self.source.chars().skip(start).take(end - start).collect()
    }
}
