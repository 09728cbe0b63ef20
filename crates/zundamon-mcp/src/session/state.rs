//! Session lifecycle states.

use crate::types::{McpError, McpResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Negotiating,
    Serving,
    Closing,
    Closed,
}

impl SessionState {
    /// Move to `next`, or fail if the lifecycle does not allow it.
    pub fn transition(self, next: SessionState) -> McpResult<SessionState> {
        use SessionState::*;
        let allowed = matches!(
            (self, next),
            (Uninitialized, Negotiating)
                | (Negotiating, Serving)
                | (Negotiating, Closing)
                | (Serving, Closing)
                | (Closing, Closed)
        );

        if allowed {
            Ok(next)
        } else {
            Err(McpError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Negotiating => "negotiating",
            SessionState::Serving => "serving",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
