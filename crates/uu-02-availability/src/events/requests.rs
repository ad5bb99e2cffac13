//! Incoming request messages

use serde::{Deserialize, Serialize};

/// Availability check request
///
/// `username` is optional on the wire; a missing value is rejected as
/// invalid input by the handler, the same as a blank one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUsernameRequest {
    #[serde(default)]
    pub username: Option<String>,
}

impl CheckUsernameRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }
}

/// Claim request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimUsernameRequest {
    #[serde(default)]
    pub username: Option<String>,
}

impl ClaimUsernameRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }
}
