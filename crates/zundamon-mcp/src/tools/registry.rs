//! Tool registration and dispatch.

use serde_json::Value;

use zundamon::PeoplePolicy;

use crate::protocol::validator::tool_arguments;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::calculate_zunda;

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![calculate_zunda::definition()]
    }

    pub fn call(
        name: &str,
        arguments: Option<Value>,
        policy: PeoplePolicy,
    ) -> McpResult<ToolCallResult> {
        let args = tool_arguments(arguments)?;

        match name {
            calculate_zunda::NAME => calculate_zunda::execute(&args, policy),
            _ => {
                tracing::error!("Unknown tool: {name}");
                Err(McpError::ToolNotFound(name.to_string()))
            }
        }
    }
}
