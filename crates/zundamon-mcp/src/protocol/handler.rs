//! Message router: lifecycle methods here, everything else to the dispatcher.

use std::sync::Arc;

use serde_json::Value;

use crate::types::*;

use super::dispatcher::Dispatcher;
use super::negotiation::NegotiatedCapabilities;
use super::registry::CapabilityRegistry;
use super::validator::{required_params, validate_request};

/// Handles every inbound JSON-RPC message for one session.
pub struct ProtocolHandler {
    dispatcher: Dispatcher,
    capabilities: NegotiatedCapabilities,
}

impl ProtocolHandler {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        let options = InitializeResult::new(registry.server_capabilities());
        Self {
            dispatcher: Dispatcher::new(registry),
            capabilities: NegotiatedCapabilities::new(options),
        }
    }

    /// What this server answers to `initialize`.
    pub fn initialization_options(&self) -> &InitializeResult {
        self.capabilities.options()
    }

    pub fn is_initialized(&self) -> bool {
        self.capabilities.initialized
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one message. Requests always produce `Some`; nothing else does.
    pub fn handle_message(&mut self, msg: JsonRpcMessage) -> Option<JsonRpcMessage> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req)),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif);
                None
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
                tracing::warn!("Received unexpected message type from client");
                None
            }
        }
    }

    /// Answer a line that could not be decoded.
    pub fn handle_malformed(&self, error: &McpError) -> JsonRpcMessage {
        tracing::warn!("Rejected inbound line: {error}");
        error.to_json_rpc_error(RequestId::Null).into()
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcMessage {
        if let Err(e) = validate_request(&request) {
            tracing::warn!("Rejected request (id={}): {e}", request.id);
            return e.to_json_rpc_error(request.id).into();
        }

        match request.method.as_str() {
            "initialize" => {
                let result = self.handle_initialize(request.params);
                respond(request.id, result)
            }
            "ping" => JsonRpcResponse::new(request.id, Value::Object(serde_json::Map::new())).into(),
            _ => {
                if !self.capabilities.initialized {
                    tracing::warn!(
                        "{} received before the initialization handshake completed",
                        request.method
                    );
                }
                self.dispatcher.dispatch(&request)
            }
        }
    }

    fn handle_notification(&mut self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => {
                self.capabilities.mark_initialized();
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                let params = notification
                    .params
                    .and_then(|p| serde_json::from_value::<CancelledParams>(p).ok());
                match params {
                    Some(p) => tracing::info!(
                        "Cancellation for request {} ignored: requests complete synchronously ({})",
                        p.request_id,
                        p.reason.as_deref().unwrap_or("no reason")
                    ),
                    None => tracing::info!("Received cancellation notification"),
                }
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    fn handle_initialize(&mut self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = required_params(params, "Initialize")?;
        let result = self.capabilities.negotiate(init_params)?;
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn respond(id: RequestId, result: McpResult<Value>) -> JsonRpcMessage {
    match result {
        Ok(value) => JsonRpcResponse::new(id, value).into(),
        Err(e) => {
            tracing::error!("Request id={id} failed: {e}");
            e.to_json_rpc_error(id).into()
        }
    }
}
