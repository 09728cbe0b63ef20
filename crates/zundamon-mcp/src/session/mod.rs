//! Session lifecycle: handshake, serving loop, shutdown.

pub mod manager;
pub mod signal;
pub mod state;

pub use manager::{Session, ShutdownReason};
pub use signal::shutdown_signal;
pub use state::SessionState;
