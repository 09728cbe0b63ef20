//! Message framing for newline-delimited JSON.

use serde::Serialize;
use serde_json::Value;

use crate::types::{JsonRpcMessage, McpError, McpResult};

/// Parse a single line of text as a JSON-RPC message.
///
/// A line carrying an `id` that [`RequestId`](crate::types::RequestId) cannot
/// hold is an invalid request, never a notification.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    let raw_id = value.get("id").cloned();

    let message: JsonRpcMessage =
        serde_json::from_value(value).map_err(|e| McpError::ParseError(e.to_string()))?;

    match (raw_id, &message) {
        (Some(id), JsonRpcMessage::Notification(_)) => Err(McpError::InvalidRequest(format!(
            "Unsupported request id: {id}"
        ))),
        _ => Ok(message),
    }
}

/// Serialize a message to a single JSON line with a trailing newline.
pub fn frame_message<T: Serialize + ?Sized>(message: &T) -> McpResult<String> {
    let mut json = serde_json::to_string(message).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}
