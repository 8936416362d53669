//! Splitting and decoding of raw tool arguments.
//!
//! Every grammar is a fixed number of `|`-separated segments where the last
//! segment takes the remainder of the string. A JSON payload may therefore
//! contain `|` as long as it is the final segment.

use recordpilot_core::error::ToolError;
use recordpilot_core::platform::Record;
use recordpilot_core::tool::{SEPARATOR, ToolKind};

pub(crate) fn parse_error(kind: ToolKind, reason: impl Into<String>) -> ToolError {
    ToolError::Parse {
        tool: kind.name().to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn validation_error(kind: ToolKind, reason: impl Into<String>) -> ToolError {
    ToolError::Validation {
        tool: kind.name().to_string(),
        reason: reason.into(),
    }
}

/// Split `raw` into exactly `parts` trimmed segments.
///
/// Splits at the first `parts - 1` separators only. Fewer segments is a
/// parse error that names the expected grammar.
pub fn split_segments(kind: ToolKind, raw: &str, parts: usize) -> Result<Vec<&str>, ToolError> {
    let segments: Vec<&str> = raw.splitn(parts, SEPARATOR).map(str::trim).collect();
    if segments.len() != parts {
        return Err(parse_error(
            kind,
            format!(
                "expected {parts} '{SEPARATOR}'-separated parts ({}), got {}",
                kind.descriptor().grammar,
                segments.len()
            ),
        ));
    }
    Ok(segments)
}

/// Decode a record payload. Anything but a JSON object is rejected.
pub fn parse_payload(kind: ToolKind, text: &str) -> Result<Record, ToolError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(parse_error(kind, "payload must be a JSON object")),
        Err(e) => Err(parse_error(kind, format!("Invalid JSON data provided: {e}"))),
    }
}

/// A table name must be non-empty.
pub fn require_table(kind: ToolKind, table: &str) -> Result<String, ToolError> {
    if table.is_empty() {
        return Err(validation_error(kind, "table name is empty"));
    }
    Ok(table.to_string())
}
