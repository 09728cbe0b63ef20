//! hello-zundamon MCP server: a greeting resource and a zunda-mochi tool over stdio.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use handlers::build_registry;
pub use protocol::{CapabilityRegistry, Dispatcher, ProtocolHandler};
pub use session::{Session, SessionState, ShutdownReason};
pub use transport::StdioTransport;
