//! Zundamon: the greeting and zunda-mochi calculator behind the hello-zundamon MCP server.

pub mod greeting;
pub mod types;
pub mod zunda;

pub use greeting::{greeting, GREETING, GREETING_DESCRIPTION, GREETING_NAME};
pub use types::*;
pub use zunda::{calculate, estimate, DEFAULT_PEOPLE, ZUNDA_PER_PERSON};
