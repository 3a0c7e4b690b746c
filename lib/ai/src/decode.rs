//! Tolerant decoding of free-text model responses.
//!
//! Models asked for JSON sometimes wrap it in a fenced code block or
//! surrounding prose. Three fixed-order strategies recover the payload:
//! direct decode, fenced-block extraction, then first-brace-to-last-brace
//! extraction. Total failure yields the caller-supplied default.

use serde::de::DeserializeOwned;

/// Decodes a model response, falling back to `default` when no strategy
/// yields valid JSON of the expected shape.
pub fn decode_lenient<T: DeserializeOwned>(content: &str, default: T) -> T {
    if let Ok(value) = serde_json::from_str(content) {
        return value;
    }

    if let Some(block) = fenced_block(content)
        && let Ok(value) = serde_json::from_str(block)
    {
        return value;
    }

    if let Some(span) = brace_span(content)
        && let Ok(value) = serde_json::from_str(span)
    {
        return value;
    }

    tracing::error!(content, "failed to decode model response");
    default
}

/// Extracts the body of a ```json fenced code block.
pub(crate) fn fenced_block(content: &str) -> Option<&str> {
    let start = content.find("```json")? + "```json".len();
    let rest = &content[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Extracts the span from the first `{` to the last `}`.
pub(crate) fn brace_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}
