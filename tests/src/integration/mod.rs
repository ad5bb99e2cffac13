//! Cross-crate integration tests

pub mod bootstrap;
pub mod concurrency;
pub mod flows;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uu_02_availability::{SaveOutcome, StoreError, UsernameRecord, UsernameStore};

/// Store wrapper counting every call, for asserting which paths touch the store.
pub struct CountingStore<S> {
    pub inner: S,
    pub exists_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            exists_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// (exists, save) call counts
    pub fn calls(&self) -> (usize, usize) {
        (
            self.exists_calls.load(Ordering::SeqCst),
            self.save_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl<S: UsernameStore> UsernameStore for CountingStore<S> {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(username).await
    }

    async fn save(&self, record: &UsernameRecord) -> Result<SaveOutcome, StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.save(record).await
    }

    async fn list_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_page(after, limit).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }
}

/// Store whose `save` sleeps before committing, so racing claimers all pass
/// the existence check before any of them writes.
pub struct SlowSaveStore {
    saved: Mutex<BTreeSet<String>>,
}

impl SlowSaveStore {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(BTreeSet::new()),
        }
    }
}

impl Default for SlowSaveStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsernameStore for SlowSaveStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.saved.lock().contains(username))
    }

    async fn save(&self, record: &UsernameRecord) -> Result<SaveOutcome, StoreError> {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let inserted = self.saved.lock().insert(record.username.to_string());
        Ok(if inserted {
            SaveOutcome::Saved
        } else {
            SaveOutcome::AlreadyExists
        })
    }

    async fn list_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let saved = self.saved.lock();
        Ok(saved
            .iter()
            .filter(|name| after.map_or(true, |cursor| name.as_str() > cursor))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.saved.lock().len() as u64)
    }
}
