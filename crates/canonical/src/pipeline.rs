use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::CanonicalizeConfig;
use crate::document::CanonicalizedDocument;
use crate::error::CanonicalError;
use crate::token::Token;

/// Normalizes text for comparison with the default configuration.
///
/// Lowercases, strips accents, turns every character that is neither a
/// word character (alphanumeric or `_`) nor whitespace into a space,
/// collapses whitespace runs and trims. Pure and idempotent:
/// `normalize(&normalize(x)) == normalize(x)`.
///
/// ```rust
/// assert_eq!(canonical::normalize("  ¡Él   corrió, rápido!  "), "el corrio rapido");
/// assert_eq!(canonical::normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut state = TokenState::with_capacity(text.len());
    process_chars(text, &CanonicalizeConfig::default(), &mut state);
    state.finish().0
}

/// Main entry point. Normalizes `input` and returns the normalized text
/// with tokens that point back into the raw input.
///
/// Input that normalizes to nothing is not an error here; the returned
/// document simply has no tokens.
pub fn canonicalize(
    doc_id: impl Into<String>,
    input: &str,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalizedDocument, CanonicalError> {
    // Version 0 is reserved.
    if cfg.version == 0 {
        return Err(CanonicalError::InvalidConfig(
            "config version must be >= 1".into(),
        ));
    }

    let doc_id: String = doc_id.into();
    let trimmed = doc_id.trim();
    if trimmed.is_empty() {
        return Err(CanonicalError::MissingDocId);
    }
    let doc_id = if doc_id.len() == trimmed.len() {
        doc_id
    } else {
        trimmed.to_string()
    };

    let mut state = TokenState::with_capacity(input.len());
    process_chars(input, cfg, &mut state);
    let (canonical_text, tokens) = state.finish();

    Ok(CanonicalizedDocument {
        doc_id,
        canonical_text,
        tokens,
        source: input.to_string(),
        canonical_version: cfg.version,
        config: cfg.clone(),
    })
}

/// Tokenizer state: the text built so far plus the token in progress.
struct TokenState {
    canonical_text: String,
    tokens: Vec<Token>,
    current: String,
    current_start: Option<usize>,
    current_end: usize,
}

impl TokenState {
    fn with_capacity(len: usize) -> Self {
        Self {
            canonical_text: String::with_capacity(len),
            tokens: Vec::with_capacity((len / 5).saturating_add(1)),
            current: String::new(),
            current_start: None,
            current_end: 0,
        }
    }

    /// Adds a folded character that came from source char `idx`.
    fn dispatch_char(&mut self, ch: char, idx: usize) {
        if is_word_char(ch) {
            self.append_char(ch, idx);
        } else {
            self.finalize_token();
        }
    }

    fn append_char(&mut self, ch: char, idx: usize) {
        if self.current_start.is_none() {
            self.current_start = Some(idx);
        }
        self.current.push(ch);
        self.current_end = idx + 1;
    }

    /// A source char folded away entirely (a bare combining mark) stays
    /// inside the surface span of the word it decorates.
    fn absorb(&mut self, idx: usize) {
        if self.current_start.is_some() {
            self.current_end = idx + 1;
        }
    }

    fn finalize_token(&mut self) {
        if let Some(start) = self.current_start.take() {
            if !self.canonical_text.is_empty() {
                self.canonical_text.push(' ');
            }
            self.canonical_text.push_str(&self.current);
            self.tokens.push(Token {
                text: std::mem::take(&mut self.current),
                position: self.tokens.len(),
                start,
                end: self.current_end,
            });
        }
    }

    fn finish(mut self) -> (String, Vec<Token>) {
        self.finalize_token();
        (self.canonical_text, self.tokens)
    }
}

fn process_chars(text: &str, cfg: &CanonicalizeConfig, state: &mut TokenState) {
    let mut folded = Vec::with_capacity(4);
    for (idx, ch) in text.chars().enumerate() {
        fold_char(ch, cfg, &mut folded);
        if folded.is_empty() {
            state.absorb(idx);
        }
        for &f in &folded {
            state.dispatch_char(f, idx);
        }
    }
}

/// Case-folds and accent-strips one character. Lowercasing can expand a
/// character into several, so output goes into `out`.
fn fold_char(ch: char, cfg: &CanonicalizeConfig, out: &mut Vec<char>) {
    out.clear();
    let mut push = |c: char| {
        if cfg.strip_accents {
            out.extend(std::iter::once(c).nfd().filter(|m| !is_combining_mark(*m)));
        } else {
            out.push(c);
        }
    };
    if cfg.lowercase {
        ch.to_lowercase().for_each(&mut push);
    } else {
        push(ch);
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
