//! # Plagio n-gram extraction
//!
//! Turns a normalized token stream into overlapping word n-grams, the unit
//! the approximate matcher compares.
//!
//! ## Contract
//!
//! - Consumes tokens already produced by the normalization layer; never
//!   normalizes or tokenizes itself.
//! - Pure function of `(tokens, config)`: same input, same windows, same
//!   order.
//!
//! ## Pipeline
//!
//! 1.  **Filtering**: tokens shorter than `min_token_chars` are dropped,
//!     and at most `max_tokens` survivors are kept.
//! 2.  **Windowing**: every run of `n` consecutive survivors forms one
//!     window; there are `max(0, t - n + 1)` of them.
//! 3.  **Length gate**: windows whose joined text is shorter than
//!     `min_ngram_chars` are skipped.
//!
//! ## Example
//!
//! ```
//! use ngram::{extract_ngrams, NGramConfig};
//!
//! let tokens = ["el", "gato", "negro", "corre", "por", "el", "jardin"];
//! let cfg = NGramConfig::default().with_n(3).with_min_ngram_chars(0);
//!
//! let grams: Vec<_> = extract_ngrams(&tokens, &cfg).unwrap().collect();
//! assert_eq!(grams[0].text, "gato negro corre");
//! assert_eq!(grams.len(), 3);
//! ```

pub mod config;
mod windows;

pub use crate::config::{NGramConfig, NGramError};
pub use crate::windows::{filter_tokens, NGram, NGrams, TokenFilter};

/// Extract the n-grams of `tokens`.
///
/// The returned iterator is lazy; window text is built on demand.
pub fn extract_ngrams<'a, S>(tokens: &'a [S], cfg: &NGramConfig) -> Result<NGrams<'a, S>, NGramError>
where
    S: AsRef<str>,
{
    cfg.validate()?;
    let filter = filter_tokens(tokens, cfg.min_token_chars, cfg.max_tokens);
    Ok(NGrams::new(tokens, filter, cfg.n, cfg.min_ngram_chars))
}

/// Extract the n-grams of a normalized document.
#[cfg(feature = "with_canonical")]
pub fn extract_document<'a>(
    doc: &'a canonical::CanonicalizedDocument,
    cfg: &NGramConfig,
) -> Result<NGrams<'a, canonical::Token>, NGramError> {
    extract_ngrams(&doc.tokens, cfg)
}
