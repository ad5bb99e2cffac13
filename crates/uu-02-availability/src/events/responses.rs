//! Outgoing response messages

use serde::{Deserialize, Serialize};

use crate::error::AvailabilityError;

/// Availability check response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUsernameResponse {
    pub available: bool,
}

/// Successful claim response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimUsernameResponse {
    /// The claimed username, verbatim
    pub username: String,
    pub message: String,
}

impl ClaimUsernameResponse {
    pub fn claimed(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: "Username claimed successfully".to_string(),
        }
    }
}

/// Error response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP-style status class (400, 409, 503, 500)
    pub status: u16,
    /// Error code
    pub error_code: u32,
    /// Error message
    pub error_message: String,
}

impl From<&AvailabilityError> for ErrorResponse {
    fn from(err: &AvailabilityError) -> Self {
        let error_code = match err {
            AvailabilityError::InvalidInput { .. } => error_codes::INVALID_INPUT,
            AvailabilityError::Conflict { .. } => error_codes::CONFLICT,
            AvailabilityError::StoreUnavailable(_) => error_codes::STORE_UNAVAILABLE,
            AvailabilityError::InvalidConfig(_) | AvailabilityError::Filter(_) => {
                error_codes::INTERNAL_ERROR
            }
        };
        Self {
            status: err.status_code(),
            error_code,
            error_message: err.to_string(),
        }
    }
}

impl From<AvailabilityError> for ErrorResponse {
    fn from(err: AvailabilityError) -> Self {
        ErrorResponse::from(&err)
    }
}

/// Error codes for availability operations
pub mod error_codes {
    /// Blank or missing username
    pub const INVALID_INPUT: u32 = 1001;
    /// Username already taken
    pub const CONFLICT: u32 = 1002;
    /// Authoritative store failed or timed out
    pub const STORE_UNAVAILABLE: u32 = 1003;
    /// Internal error
    pub const INTERNAL_ERROR: u32 = 1099;
}
