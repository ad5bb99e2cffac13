//! Request handler for check and claim
//!
//! Rules:
//! - Missing or blank `username` -> 400 `INVALID_INPUT`, no lookup performed
//! - Conflict -> 409, store failure -> 503, anything else -> 500

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AvailabilityError;
use crate::events::{
    CheckUsernameRequest, CheckUsernameResponse, ClaimUsernameRequest, ClaimUsernameResponse,
    ErrorResponse,
};
use crate::ports::AvailabilityApi;

/// Request handler in front of an availability API
pub struct RequestHandler<A: AvailabilityApi + ?Sized> {
    api: Arc<A>,
}

impl<A: AvailabilityApi + ?Sized> RequestHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn handle_check(
        &self,
        request: CheckUsernameRequest,
    ) -> Result<CheckUsernameResponse, ErrorResponse> {
        let username = required(request.username)?;
        let outcome = self.api.check(&username).await.map_err(reject)?;

        debug!(username = %username, resolution = ?outcome.resolution, "check handled");
        Ok(CheckUsernameResponse {
            available: outcome.available,
        })
    }

    pub async fn handle_claim(
        &self,
        request: ClaimUsernameRequest,
    ) -> Result<ClaimUsernameResponse, ErrorResponse> {
        let username = required(request.username)?;
        let record = self.api.claim(&username).await.map_err(reject)?;

        Ok(ClaimUsernameResponse::claimed(record.username.into_inner()))
    }
}

fn required(username: Option<String>) -> Result<String, ErrorResponse> {
    username.ok_or_else(|| reject(AvailabilityError::invalid_input("username is required")))
}

fn reject(err: AvailabilityError) -> ErrorResponse {
    if !err.is_client_error() {
        warn!(error = %err, "request failed");
    }
    ErrorResponse::from(err)
}
