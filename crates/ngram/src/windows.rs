//! Token filtering and sliding word windows.
//!
//! Both run in O(t) over the number of tokens; window text is only built
//! when the iterator is advanced.

use serde::{Deserialize, Serialize};

/// A window of `n` consecutive post-filter tokens.
///
/// `start` and `end` index the post-filter token sequence, so
/// `end - start == n` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NGram {
    /// Tokens joined by single spaces.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl AsRef<str> for NGram {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Result of the pre-windowing token filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenFilter {
    /// Indices into the input slice of the tokens that survived, in order.
    pub kept: Vec<usize>,
    /// True when the token cap cut the document short.
    pub truncated: bool,
}

impl TokenFilter {
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Keeps tokens with at least `min_chars` characters, up to `max_tokens`.
pub fn filter_tokens<S: AsRef<str>>(tokens: &[S], min_chars: usize, max_tokens: usize) -> TokenFilter {
    let mut kept = Vec::with_capacity(tokens.len().min(max_tokens));
    let mut truncated = false;
    for (idx, token) in tokens.iter().enumerate() {
        if token.as_ref().chars().count() < min_chars {
            continue;
        }
        if kept.len() == max_tokens {
            truncated = true;
            break;
        }
        kept.push(idx);
    }
    TokenFilter { kept, truncated }
}

/// Lazy iterator over the n-grams of a filtered token sequence.
///
/// A clone continues from the same position; [`NGrams::restart`] gives a
/// fresh pass over the same windows.
#[derive(Debug)]
pub struct NGrams<'a, S> {
    tokens: &'a [S],
    filter: TokenFilter,
    n: usize,
    min_chars: usize,
    cursor: usize,
}

// `tokens` is a borrowed slice, so cloning never needs `S: Clone`.
impl<S> Clone for NGrams<'_, S> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens,
            filter: self.filter.clone(),
            n: self.n,
            min_chars: self.min_chars,
            cursor: self.cursor,
        }
    }
}

impl<'a, S: AsRef<str>> NGrams<'a, S> {
    pub(crate) fn new(tokens: &'a [S], filter: TokenFilter, n: usize, min_chars: usize) -> Self {
        Self {
            tokens,
            filter,
            n,
            min_chars,
            cursor: 0,
        }
    }

    /// Number of windows before the character-length filter:
    /// `max(0, t - n + 1)` for `t` post-filter tokens.
    pub fn window_count(&self) -> usize {
        (self.filter.len() + 1).saturating_sub(self.n)
    }

    /// Window size in tokens.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The post-filter token sequence the windows index into.
    pub fn token_filter(&self) -> &TokenFilter {
        &self.filter
    }

    /// A fresh iterator over the same windows.
    pub fn restart(&self) -> Self {
        Self {
            cursor: 0,
            ..self.clone()
        }
    }

    fn token(&self, filtered_idx: usize) -> &str {
        self.tokens[self.filter.kept[filtered_idx]].as_ref()
    }

    fn joined_len(&self, start: usize) -> usize {
        let chars: usize = (start..start + self.n)
            .map(|i| self.token(i).chars().count())
            .sum();
        chars + self.n - 1
    }
}

impl<S: AsRef<str>> Iterator for NGrams<'_, S> {
    type Item = NGram;

    fn next(&mut self) -> Option<Self::Item> {
        let windows = self.window_count();
        while self.cursor < windows {
            let start = self.cursor;
            self.cursor += 1;
            if self.joined_len(start) < self.min_chars {
                continue;
            }
            let mut text = String::new();
            for i in start..start + self.n {
                if i > start {
                    text.push(' ');
                }
                text.push_str(self.token(i));
            }
            return Some(NGram {
                text,
                start,
                end: start + self.n,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.window_count().saturating_sub(self.cursor)))
    }
}
