//! Username value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AvailabilityError;

/// A username that passed input validation.
///
/// The only rule is non-blankness: empty and whitespace-only strings are
/// rejected. The value is kept exactly as given (no trimming or case folding),
/// so "Alice" and "alice" are distinct usernames.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, AvailabilityError> {
        if raw.trim().is_empty() {
            return Err(AvailabilityError::invalid_input("username cannot be empty"));
        }
        Ok(Username(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authoritative store entity. Identity is the username alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsernameRecord {
    pub username: Username,
    /// Seconds since the Unix epoch when the claim was persisted
    pub claimed_at: u64,
}

impl UsernameRecord {
    pub fn new(username: Username) -> Self {
        let claimed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            username,
            claimed_at,
        }
    }
}

impl PartialEq for UsernameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for UsernameRecord {}

/// How a check reached its answer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Filter said "definitely absent"; store not consulted
    FilterMiss,
    /// Filter said "might contain" and the store confirmed the record
    StoreConfirmed,
    /// Filter said "might contain" but the store has no record
    FalsePositive,
}

/// Result of a check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub available: bool,
    pub resolution: Resolution,
}

impl CheckOutcome {
    pub fn from_resolution(resolution: Resolution) -> Self {
        Self {
            available: resolution != Resolution::StoreConfirmed,
            resolution,
        }
    }
}
