//! Decoding of model responses into [`ExternalMatch`] entries.
//!
//! Models wrap their JSON in prose or code fences often enough that the
//! outermost `{...}` is cut out of the text before parsing. Each entry of
//! `matches` is decoded on its own; one bad entry does not sink the rest.

use matcher::{ExternalMatch, SourceError};
use serde_json::Value;
use tracing::debug;

/// Concatenated text parts of the first candidate.
pub fn candidate_text(response: &Value) -> Result<String, SourceError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::MalformedResponse("response has no candidate parts".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(SourceError::MalformedResponse("candidate text is empty".into()));
    }
    Ok(text)
}

/// Slice from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Decodes the `matches` array of a model answer.
///
/// A missing `matches` key is an empty answer, not an error.
pub fn decode_matches(text: &str) -> Result<Vec<ExternalMatch>, SourceError> {
    let object = extract_json_object(text)
        .ok_or_else(|| SourceError::MalformedResponse("no JSON object in model output".into()))?;
    let mut parsed: Value = serde_json::from_str(object)
        .map_err(|e| SourceError::MalformedResponse(format!("invalid JSON in model output: {e}")))?;

    let entries = match parsed.get_mut("matches").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(_) => {
            return Err(SourceError::MalformedResponse(
                "`matches` is not an array".into(),
            ))
        }
    };

    let total = entries.len();
    let decoded: Vec<ExternalMatch> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if decoded.len() < total {
        debug!(
            received = total,
            dropped = total - decoded.len(),
            "dropped undecodable model matches"
        );
    }
    Ok(decoded)
}
