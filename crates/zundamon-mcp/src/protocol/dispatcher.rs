//! Request dispatch: resolve the handler, run it, wrap the outcome.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::types::{
    JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, McpError, McpResult, RequestKind,
};

use super::registry::CapabilityRegistry;

/// Turns one request into exactly one response envelope.
///
/// This is the only error boundary around handlers: whatever a handler does,
/// including panicking, the caller gets a response carrying the request's id.
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcMessage {
        let id = request.id.clone();

        match self.invoke(request) {
            Ok(result) => JsonRpcResponse::new(id, result).into(),
            Err(e) => {
                tracing::error!("{} (id={id}) failed: {e:?}", request.method);
                e.to_json_rpc_error(id).into()
            }
        }
    }

    fn invoke(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let kind = RequestKind::from_method(&request.method)
            .ok_or_else(|| McpError::MethodNotFound(request.method.clone()))?;
        let handler = self.registry.resolve(kind)?;

        tracing::debug!("Dispatching {kind} (id={})", request.id);
        let params = request.params.clone();

        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(params))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(e)),
            Err(payload) => Err(McpError::HandlerFailure(panic_message(payload.as_ref()))),
        }
    }
}

/// Keep errors the peer can act on, fold everything else into `HandlerFailure`.
fn classify(e: McpError) -> McpError {
    match e {
        McpError::ResourceNotFound(_)
        | McpError::ToolNotFound(_)
        | McpError::InvalidParams(_)
        | McpError::MethodNotFound(_)
        | McpError::HandlerFailure(_) => e,
        other => McpError::HandlerFailure(other.to_string()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
