//! The four request handlers and their registration.

use serde_json::Value;

use zundamon::PeoplePolicy;

use crate::protocol::validator::required_params;
use crate::protocol::{CapabilityRegistry, RegistryBuilder};
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::types::{
    McpError, McpResult, RequestKind, ResourceListResult, ResourceReadParams, ToolCallParams,
    ToolListResult,
};

pub fn list_resources(_params: Option<Value>) -> McpResult<Value> {
    let result = ResourceListResult {
        resources: ResourceRegistry::list_resources(),
        next_cursor: None,
    };
    tracing::debug!("Listing {} resource(s)", result.resources.len());
    to_value(result)
}

pub fn read_resource(params: Option<Value>) -> McpResult<Value> {
    let read_params: ResourceReadParams = required_params(params, "Resource read")?;
    tracing::debug!("Reading resource {}", read_params.uri);
    to_value(ResourceRegistry::read(&read_params.uri)?)
}

pub fn list_tools(_params: Option<Value>) -> McpResult<Value> {
    let result = ToolListResult {
        tools: ToolRegistry::list_tools(),
        next_cursor: None,
    };
    tracing::debug!("Listing {} tool(s)", result.tools.len());
    to_value(result)
}

pub fn call_tool(params: Option<Value>, policy: PeoplePolicy) -> McpResult<Value> {
    let call_params: ToolCallParams = required_params(params, "Tool call")?;
    tracing::debug!(
        "Calling tool {} with {:?}",
        call_params.name,
        call_params.arguments
    );
    to_value(ToolRegistry::call(
        &call_params.name,
        call_params.arguments,
        policy,
    )?)
}

/// Bind all four request kinds.
pub fn register_all(builder: &mut RegistryBuilder, policy: PeoplePolicy) -> McpResult<()> {
    builder
        .register(RequestKind::ListResources, list_resources)?
        .register(RequestKind::ReadResource, read_resource)?
        .register(RequestKind::ListTools, list_tools)?
        .register(
            RequestKind::CallTool,
            move |params: Option<Value>| -> McpResult<Value> { call_tool(params, policy) },
        )?;
    Ok(())
}

/// Build the server's registry.
pub fn build_registry(policy: PeoplePolicy) -> McpResult<CapabilityRegistry> {
    let mut builder = CapabilityRegistry::builder();
    register_all(&mut builder, policy)?;
    let registry = builder.build();
    tracing::info!(
        "Registered handlers: {}",
        registry
            .kinds()
            .map(|k| k.method())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(registry)
}

fn to_value(value: impl serde::Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}
