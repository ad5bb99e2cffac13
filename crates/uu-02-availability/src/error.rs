//! Error types for the availability subsystem

use thiserror::Error;
use uu_01_membership_filter::FilterError;

/// Errors surfaced by `check` and `claim`
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// Blank or missing username
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Claim on a username that already exists in the store
    #[error("Username already taken: {username}")]
    Conflict { username: String },

    /// Authoritative store call failed or timed out
    #[error("Username store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
}

impl AvailabilityError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AvailabilityError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Response status class for the request layer
    pub fn status_code(&self) -> u16 {
        match self {
            AvailabilityError::InvalidInput { .. } => 400,
            AvailabilityError::Conflict { .. } => 409,
            AvailabilityError::StoreUnavailable(_) => 503,
            AvailabilityError::InvalidConfig(_) | AvailabilityError::Filter(_) => 500,
        }
    }

    /// True when the caller, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Errors from the authoritative username store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
