//! Sentence splitting for verbatim sentence comparison.

use serde::{Deserialize, Serialize};

/// A trimmed sentence with char offsets into the text it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[inline]
fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Splits `text` on `.`, `!` and `?`, trims each piece and drops empty ones.
///
/// ```rust
/// let s = canonical::split_sentences("Uno. Dos dos!  ");
/// assert_eq!(s.len(), 2);
/// assert_eq!(s[1].text, "Dos dos");
/// assert_eq!((s[1].start, s[1].end), (5, 12));
/// ```
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut seg_start = 0;

    for idx in 0..=chars.len() {
        if idx < chars.len() && !is_terminator(chars[idx]) {
            continue;
        }
        let segment = &chars[seg_start..idx];
        let lead = segment.iter().take_while(|c| c.is_whitespace()).count();
        let trail = segment[lead..]
            .iter()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count();
        if lead + trail < segment.len() {
            let start = seg_start + lead;
            let end = idx - trail;
            sentences.push(Sentence {
                text: chars[start..end].iter().collect(),
                start,
                end,
            });
        }
        seg_start = idx + 1;
    }

    sentences
}
