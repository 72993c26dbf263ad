//! Plagio normalization layer.
//!
//! Folds raw document text into the comparable form every later stage
//! works on, and keeps enough position data to map results back to the
//! original wording.
//!
//! ## What we do
//!
//! - Locale-free lowercasing
//! - Accent stripping (NFD, combining marks dropped)
//! - Non-word characters become delimiters; whitespace is collapsed
//! - Tokenization with char offsets into the raw input
//! - Sentence splitting on `.`, `!`, `?`
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same text and config give
//! the same output on any machine.

mod config;
mod document;
mod error;
mod pipeline;
mod sentence;
mod token;
mod whitespace;

pub use crate::config::CanonicalizeConfig;
pub use crate::document::CanonicalizedDocument;
pub use crate::error::CanonicalError;
pub use crate::pipeline::{canonicalize, normalize};
pub use crate::sentence::{split_sentences, Sentence};
pub use crate::token::Token;
pub use crate::whitespace::collapse_whitespace;
