//! Capability registry: one handler per request kind, frozen after startup.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{
    LoggingCapability, McpError, McpResult, RequestKind, ResourcesCapability, ServerCapabilities,
    ToolsCapability,
};

/// A function implementing one request kind.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, params: Option<Value>) -> McpResult<Value>;
}

impl<F> RequestHandler for F
where
    F: Fn(Option<Value>) -> McpResult<Value> + Send + Sync,
{
    fn handle(&self, params: Option<Value>) -> McpResult<Value> {
        self(params)
    }
}

/// Collects registrations before the registry is frozen.
///
/// Registering the same kind twice is an error; the first binding is kept.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: BTreeMap<RequestKind, Box<dyn RequestHandler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, kind: RequestKind, handler: H) -> McpResult<&mut Self>
    where
        H: RequestHandler + 'static,
    {
        if self.handlers.contains_key(&kind) {
            return Err(McpError::DuplicateRegistration(kind));
        }
        tracing::debug!("Registered handler for {kind}");
        self.handlers.insert(kind, Box::new(handler));
        Ok(self)
    }

    pub fn build(self) -> CapabilityRegistry {
        CapabilityRegistry {
            handlers: self.handlers,
        }
    }
}

/// Immutable request-kind → handler table.
pub struct CapabilityRegistry {
    handlers: BTreeMap<RequestKind, Box<dyn RequestHandler>>,
}

impl CapabilityRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn resolve(&self, kind: RequestKind) -> McpResult<&dyn RequestHandler> {
        self.handlers
            .get(&kind)
            .map(|h| h.as_ref())
            .ok_or_else(|| McpError::MethodNotFound(kind.method().to_string()))
    }

    /// Registered kinds, in a stable order.
    pub fn kinds(&self) -> impl Iterator<Item = RequestKind> + '_ {
        self.handlers.keys().copied()
    }

    /// Capabilities advertised during `initialize`.
    pub fn server_capabilities(&self) -> ServerCapabilities {
        let has_resources = self.kinds().any(RequestKind::is_resource);
        let has_tools = self.kinds().any(RequestKind::is_tool);

        ServerCapabilities {
            logging: Some(LoggingCapability {}),
            resources: has_resources.then(ResourcesCapability::default),
            tools: has_tools.then(ToolsCapability::default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_handler(_params: Option<Value>) -> McpResult<Value> {
        Ok(json!({"ok": true}))
    }

    #[test]
    fn test_resolve_registered_kind() {
        let mut builder = CapabilityRegistry::builder();
        builder.register(RequestKind::ListTools, ok_handler).unwrap();
        let registry = builder.build();

        let handler = registry.resolve(RequestKind::ListTools).unwrap();
        assert_eq!(handler.handle(None).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn test_resolve_unknown_kind() {
        let registry = CapabilityRegistry::builder().build();
        let err = registry.resolve(RequestKind::CallTool).err().unwrap();
        assert_eq!(err.code(), -32601);
        assert!(err.to_string().contains("tools/call"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut builder = CapabilityRegistry::builder();
        builder.register(RequestKind::ReadResource, ok_handler).unwrap();
        let err = builder
            .register(RequestKind::ReadResource, |_: Option<Value>| -> McpResult<Value> {
                Ok(json!(null))
            })
            .err()
            .unwrap();
        assert!(matches!(err, McpError::DuplicateRegistration(RequestKind::ReadResource)));

        // First binding survives.
        let registry = builder.build();
        let value = registry.resolve(RequestKind::ReadResource).unwrap().handle(None).unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn test_capabilities_follow_registered_kinds() {
        let mut builder = CapabilityRegistry::builder();
        builder.register(RequestKind::CallTool, ok_handler).unwrap();
        let caps = builder.build().server_capabilities();
        assert!(caps.tools.is_some());
        assert!(caps.resources.is_none());
        assert!(caps.logging.is_some());
    }

    #[test]
    fn test_kinds_are_ordered() {
        let mut builder = CapabilityRegistry::builder();
        builder
            .register(RequestKind::CallTool, ok_handler)
            .unwrap()
            .register(RequestKind::ListResources, ok_handler)
            .unwrap();
        let kinds: Vec<_> = builder.build().kinds().collect();
        assert_eq!(kinds, vec![RequestKind::ListResources, RequestKind::CallTool]);
    }
}
