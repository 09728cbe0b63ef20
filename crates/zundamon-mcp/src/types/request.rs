//! MCP request kinds and parameter types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The request kinds a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKind {
    ListResources,
    ReadResource,
    ListTools,
    CallTool,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::ListResources,
        RequestKind::ReadResource,
        RequestKind::ListTools,
        RequestKind::CallTool,
    ];

    /// Wire method name.
    pub fn method(self) -> &'static str {
        match self {
            RequestKind::ListResources => "resources/list",
            RequestKind::ReadResource => "resources/read",
            RequestKind::ListTools => "tools/list",
            RequestKind::CallTool => "tools/call",
        }
    }

    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.method() == method)
    }

    pub fn is_resource(self) -> bool {
        matches!(self, RequestKind::ListResources | RequestKind::ReadResource)
    }

    pub fn is_tool(self) -> bool {
        matches!(self, RequestKind::ListTools | RequestKind::CallTool)
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelledParams {
    #[serde(rename = "requestId")]
    pub request_id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
