//! Core data types for Zundamon's capabilities.

use serde::{Deserialize, Serialize};

/// How an out-of-range `people` value is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeoplePolicy {
    /// Replace the value with a single person.
    #[default]
    Normalize,
    /// Refuse the value with [`ZundaError::InvalidPeople`].
    Reject,
}

/// The result of a zunda-mochi calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZundaEstimate {
    pub people: u64,
    pub total: u128,
}

impl std::fmt::Display for ZundaEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}人分のずんだもちは{}個必要なのだ！",
            self.people, self.total
        )
    }
}

/// Errors raised by the capability library.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ZundaError {
    #[error("Invalid people count: {0} (expected a positive integer)")]
    InvalidPeople(String),
}

/// Convenience result type.
pub type ZundaResult<T> = Result<T, ZundaError>;
