//! Outbound Ports (Driven Ports)
//!
//! The authoritative store is the system of record for claimed usernames.
//! The filter never replaces it.

use async_trait::async_trait;

use crate::domain::UsernameRecord;
use crate::error::StoreError;

/// Result of persisting a record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Record written
    Saved,
    /// A record with the same username was already present; nothing written
    AlreadyExists,
}

/// Authoritative username store (Driven Port)
///
/// Production: `RocksDbUsernameStore` (feature `rocksdb`)
/// Testing: `InMemoryUsernameStore`
#[async_trait]
pub trait UsernameStore: Send + Sync {
    /// Whether a record exists for `username`
    async fn exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Persist `record` unless its username already exists.
    ///
    /// Must be atomic with respect to concurrent saves of the same username:
    /// exactly one caller observes `Saved`.
    async fn save(&self, record: &UsernameRecord) -> Result<SaveOutcome, StoreError>;

    /// Up to `limit` usernames in ascending order, strictly after `after`.
    ///
    /// Used to replay every record into a fresh filter at startup. An empty
    /// page means the scan is complete.
    async fn list_page(&self, after: Option<&str>, limit: usize)
        -> Result<Vec<String>, StoreError>;

    /// Number of stored records
    async fn count(&self) -> Result<u64, StoreError>;
}
