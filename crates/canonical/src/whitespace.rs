//! Whitespace normalization utilities.

/// Collapses repeated Unicode whitespace into single ASCII spaces and trims
/// both ends.
///
/// Keeps case and accents; report excerpts use it so a match spanning a
/// line break reads as one line.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  hola \t\n mundo  "), "hola mundo");
/// assert_eq!(collapse_whitespace("hola\u{00A0}mundo"), "hola mundo");
/// assert_eq!(collapse_whitespace("   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
