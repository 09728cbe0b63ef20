//! MCP protocol handling: JSON-RPC routing, registry and dispatch.

pub mod dispatcher;
pub mod handler;
pub mod negotiation;
pub mod registry;
pub mod validator;

pub use dispatcher::Dispatcher;
pub use handler::ProtocolHandler;
pub use registry::{CapabilityRegistry, RegistryBuilder, RequestHandler};
