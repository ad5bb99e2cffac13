//! In-memory username store

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::domain::UsernameRecord;
use crate::error::StoreError;
use crate::ports::{SaveOutcome, UsernameStore};

/// Username store backed by an ordered map.
///
/// `save` takes the write lock for its check-and-insert, so concurrent saves
/// of the same username produce exactly one `Saved`.
#[derive(Default)]
pub struct InMemoryUsernameStore {
    records: RwLock<BTreeMap<String, UsernameRecord>>,
}

impl InMemoryUsernameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `records`; later duplicates are ignored.
    pub fn with_records(records: impl IntoIterator<Item = UsernameRecord>) -> Self {
        let mut map = BTreeMap::new();
        for record in records {
            map.entry(record.username.to_string()).or_insert(record);
        }
        Self {
            records: RwLock::new(map),
        }
    }

    /// Stored record for `username`, if any
    pub fn get(&self, username: &str) -> Option<UsernameRecord> {
        self.records.read().get(username).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl UsernameStore for InMemoryUsernameStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.records.read().contains_key(username))
    }

    async fn save(&self, record: &UsernameRecord) -> Result<SaveOutcome, StoreError> {
        let mut records = self.records.write();
        let key = record.username.as_str();
        if records.contains_key(key) {
            return Ok(SaveOutcome::AlreadyExists);
        }
        records.insert(key.to_owned(), record.clone());
        Ok(SaveOutcome::Saved)
    }

    async fn list_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let lower = match after {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };
        let records = self.records.read();
        Ok(records
            .range::<str, _>((lower, Bound::Unbounded))
            .take(limit)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().len() as u64)
    }
}
