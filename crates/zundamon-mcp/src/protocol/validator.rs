//! JSON-RPC message and argument validation.

use serde_json::{Map, Value};

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

/// Validate that a JSON-RPC request is well-formed.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "Expected jsonrpc version \"{JSONRPC_VERSION}\", got \"{}\"",
            request.jsonrpc
        )));
    }

    if request.method.trim().is_empty() {
        return Err(McpError::InvalidRequest(
            "Method name must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Tool arguments must be a JSON object; absent or `null` means no arguments.
pub fn tool_arguments(arguments: Option<Value>) -> McpResult<Map<String, Value>> {
    match arguments {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(McpError::InvalidParams(format!(
            "Tool arguments must be an object, got {other}"
        ))),
    }
}

/// Decode required request params into `T`.
pub fn required_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
    what: &str,
) -> McpResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams(format!("{what} params required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;
    use serde_json::json;

    fn req(jsonrpc: &str, method: &str) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: jsonrpc.to_string(),
            id: RequestId::Number(1),
            method: method.to_string(),
            params: None,
        }
    }

    #[test]
    fn test_validate_request() {
        assert!(validate_request(&req("2.0", "tools/list")).is_ok());
        assert_eq!(validate_request(&req("1.0", "tools/list")).unwrap_err().code(), -32600);
        assert_eq!(validate_request(&req("2.0", " ")).unwrap_err().code(), -32600);
    }

    #[test]
    fn test_tool_arguments() {
        assert!(tool_arguments(None).unwrap().is_empty());
        assert!(tool_arguments(Some(Value::Null)).unwrap().is_empty());
        assert_eq!(tool_arguments(Some(json!({"people": 2}))).unwrap()["people"], 2);
        assert_eq!(tool_arguments(Some(json!([2]))).unwrap_err().code(), -32602);
    }
}
