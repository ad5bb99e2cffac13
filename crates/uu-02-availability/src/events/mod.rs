//! Events Layer - Request/Response Message Types

pub mod requests;
pub mod responses;

pub use requests::{CheckUsernameRequest, ClaimUsernameRequest};
pub use responses::{error_codes, CheckUsernameResponse, ClaimUsernameResponse, ErrorResponse};
