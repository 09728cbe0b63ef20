//! The session: one connection, driven from handshake to close.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};

use crate::protocol::{CapabilityRegistry, ProtocolHandler};
use crate::transport::{Frame, StdioTransport};
use crate::types::McpResult;

use super::signal::shutdown_signal;
use super::state::SessionState;

/// Why a session ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    EndOfStream,
    Interrupted,
}

/// Serves one peer over a stream pair, one request at a time.
pub struct Session<R, W> {
    transport: StdioTransport<R, W>,
    handler: ProtocolHandler,
    state: SessionState,
}

impl Session<Stdin, Stdout> {
    pub fn stdio(registry: Arc<CapabilityRegistry>) -> Self {
        Self::new(registry, StdioTransport::stdio())
    }
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(registry: Arc<CapabilityRegistry>, transport: StdioTransport<R, W>) -> Self {
        Self {
            transport,
            handler: ProtocolHandler::new(registry),
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }

    pub fn into_transport(self) -> StdioTransport<R, W> {
        self.transport
    }

    /// Serve until end of stream or Ctrl+C / SIGTERM.
    pub async fn run(&mut self) -> McpResult<ShutdownReason> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until end of stream or until `shutdown` resolves.
    ///
    /// When `shutdown` fires, the request in flight (if any) is dropped without
    /// a response.
    pub async fn run_until<F>(&mut self, shutdown: F) -> McpResult<ShutdownReason>
    where
        F: Future<Output = ()>,
    {
        self.advance(SessionState::Negotiating)?;
        match serde_json::to_string(self.handler.initialization_options()) {
            Ok(options) => tracing::debug!("Initialization options: {options}"),
            Err(e) => tracing::debug!("Initialization options not printable: {e}"),
        }
        tracing::info!("Waiting for client on stream pair");

        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupted, shutting down");
                    break Ok(ShutdownReason::Interrupted);
                }
                step = self.step() => match step {
                    Ok(true) => {}
                    Ok(false) => break Ok(ShutdownReason::EndOfStream),
                    Err(e) => {
                        tracing::error!("Transport failure: {e}");
                        break Err(e);
                    }
                },
            }
        };

        self.advance(SessionState::Closing)?;
        if let Err(e) = self.transport.close().await {
            tracing::warn!("Failed to close output stream: {e}");
        }
        self.advance(SessionState::Closed)?;

        outcome
    }

    /// Read, handle and answer one frame. `Ok(false)` at end of stream.
    async fn step(&mut self) -> McpResult<bool> {
        let Some(frame) = self.transport.receive().await? else {
            return Ok(false);
        };

        let reply = match frame {
            Frame::Message(msg) => self.handler.handle_message(msg),
            Frame::Malformed(e) => Some(self.handler.handle_malformed(&e)),
        };

        if self.state == SessionState::Negotiating && self.handler.is_initialized() {
            self.advance(SessionState::Serving)?;
        }

        if let Some(reply) = reply {
            self.transport.send(&reply).await?;
        }
        Ok(true)
    }

    fn advance(&mut self, next: SessionState) -> McpResult<()> {
        self.state = self.state.transition(next)?;
        tracing::debug!("Session state: {}", self.state);
        Ok(())
    }
}
