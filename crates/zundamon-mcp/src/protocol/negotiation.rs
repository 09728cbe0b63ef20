//! MCP capability negotiation during initialization.

use crate::types::{Implementation, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// Handshake progress and who the client said it was.
#[derive(Debug, Clone)]
pub struct NegotiatedCapabilities {
    options: InitializeResult,
    client: Option<Implementation>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Start a handshake that will answer `initialize` with `options`.
    pub fn new(options: InitializeResult) -> Self {
        Self {
            options,
            client: None,
            initialized: false,
        }
    }

    pub fn options(&self) -> &InitializeResult {
        &self.options
    }

    /// The peer named in the last `initialize`, if any.
    pub fn client(&self) -> Option<&Implementation> {
        self.client.as_ref()
    }

    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        if let Some(previous) = &self.client {
            tracing::warn!("Repeated initialize request, replacing client {}", previous.name);
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );
        tracing::debug!("Client capabilities: {:?}", params.capabilities);
        self.client = Some(params.client_info);

        Ok(self.options.clone())
    }

    /// Record the client's `initialized` notification.
    ///
    /// Returns `false` when the notification arrived before any `initialize`.
    pub fn mark_initialized(&mut self) -> bool {
        let Some(client) = &self.client else {
            tracing::warn!("Received initialized notification before initialize");
            return false;
        };
        tracing::info!("MCP handshake complete with {} v{}", client.name, client.version);
        self.initialized = true;
        true
    }
}
