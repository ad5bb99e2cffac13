//! Inbound Ports (Driving Ports)
//!
//! The API request handlers call into.

use async_trait::async_trait;

use crate::domain::{CheckOutcome, UsernameRecord};
use crate::error::AvailabilityError;

/// Username availability API (Driving Port)
#[async_trait]
pub trait AvailabilityApi: Send + Sync {
    /// Decide whether `username` is available.
    ///
    /// Flow:
    /// 1. Blank input -> `InvalidInput`
    /// 2. Filter miss -> available, store not consulted
    /// 3. Filter hit -> store `exists` decides
    async fn check(&self, username: &str) -> Result<CheckOutcome, AvailabilityError>;

    /// Claim `username`.
    ///
    /// The store is checked first and written before the filter is updated.
    /// An existing record yields `Conflict` and leaves the filter untouched.
    /// A failed or timed-out save may still have committed, so the filter is
    /// updated anyway and `StoreUnavailable` is returned.
    async fn claim(&self, username: &str) -> Result<UsernameRecord, AvailabilityError>;
}
