//! MCP tool implementations.

pub mod calculate_zunda;
pub mod registry;

pub use registry::ToolRegistry;
