//! # RocksDB Username Store
//!
//! Durable implementation of the `UsernameStore` port.
//!
//! ## Layout
//!
//! - key: username bytes (UTF-8), so RocksDB's bytewise ordering gives the
//!   ascending scan `list_page` needs
//! - value: bincode-encoded `UsernameRecord`
//!
//! DB calls run on the blocking pool. `save` holds a striped per-key lock
//! across its get + put, which makes the existence check and the write atomic
//! for this process without blocking lookups of other usernames.

use async_trait::async_trait;
use parking_lot::Mutex;
use rocksdb::{Direction, IteratorMode, Options, WriteOptions, DB};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::domain::UsernameRecord;
use crate::error::StoreError;
use crate::ports::{SaveOutcome, UsernameStore};

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbStoreConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each claim (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbStoreConfig {
    fn default() -> Self {
        Self {
            path: "./data/usernames".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbStoreConfig {
    /// Config for testing (small buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// Number of per-key save locks
const KEY_LOCK_STRIPES: usize = 64;

/// RocksDB-backed username store
pub struct RocksDbUsernameStore {
    shared: Arc<Shared>,
}

/// State moved onto the blocking pool
struct Shared {
    db: DB,
    /// Striped locks serializing get + put per username; reads take none
    key_locks: Box<[Mutex<()>]>,
    /// Record count, seeded by a key scan at open
    records: AtomicU64,
    sync_writes: bool,
}

impl Shared {
    fn key_lock(&self, key: &[u8]) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.key_locks[(hasher.finish() % self.key_locks.len() as u64) as usize]
    }
}

impl RocksDbUsernameStore {
    /// Open or create the database
    pub fn open(config: RocksDbStoreConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path)
            .map_err(|e| StoreError::Connection(format!("Failed to open RocksDB: {}", e)))?;

        let mut records = 0u64;
        for item in db.iterator(IteratorMode::Start) {
            item.map_err(|e| StoreError::Io(format!("RocksDB scan failed: {}", e)))?;
            records += 1;
        }

        info!(path = %config.path, records, "username store opened");

        let key_locks = (0..KEY_LOCK_STRIPES).map(|_| Mutex::new(())).collect();
        Ok(Self {
            shared: Arc::new(Shared {
                db,
                key_locks,
                records: AtomicU64::new(records),
                sync_writes: config.sync_writes,
            }),
        })
    }

    /// Open with default tuning at `path`
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(RocksDbStoreConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    /// Run a synchronous RocksDB call on the blocking pool.
    ///
    /// The call runs to completion even if the returned future is dropped.
    async fn blocking<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Shared) -> Result<T, StoreError> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || call(&shared))
            .await
            .map_err(|e| StoreError::Io(format!("RocksDB task failed: {}", e)))?
    }
}

#[async_trait]
impl UsernameStore for RocksDbUsernameStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        let key = username.as_bytes().to_vec();
        self.blocking(move |shared| {
            shared
                .db
                .get_pinned(&key)
                .map(|v| v.is_some())
                .map_err(|e| StoreError::Io(format!("RocksDB exists check failed: {}", e)))
        })
        .await
    }

    async fn save(&self, record: &UsernameRecord) -> Result<SaveOutcome, StoreError> {
        let key = record.username.as_str().as_bytes().to_vec();
        let value =
            bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.blocking(move |shared| {
            let _guard = shared.key_lock(&key).lock();
            let present = shared
                .db
                .get_pinned(&key)
                .map_err(|e| StoreError::Io(format!("RocksDB get failed: {}", e)))?
                .is_some();
            if present {
                return Ok(SaveOutcome::AlreadyExists);
            }

            let mut write_opts = WriteOptions::default();
            write_opts.set_sync(shared.sync_writes);
            shared
                .db
                .put_opt(&key, &value, &write_opts)
                .map_err(|e| StoreError::Io(format!("RocksDB put failed: {}", e)))?;

            // Counted with the write, so a dropped caller cannot skip it
            shared.records.fetch_add(1, Ordering::Relaxed);
            Ok(SaveOutcome::Saved)
        })
        .await
    }

    async fn list_page(
        &self,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let cursor = after.map(|c| c.as_bytes().to_vec());
        self.blocking(move |shared| {
            let mode = match &cursor {
                Some(cursor) => IteratorMode::From(cursor.as_slice(), Direction::Forward),
                None => IteratorMode::Start,
            };

            let mut page = Vec::with_capacity(limit.min(1024));
            for item in shared.db.iterator(mode) {
                if page.len() >= limit {
                    break;
                }
                let (key, _) =
                    item.map_err(|e| StoreError::Io(format!("RocksDB scan failed: {}", e)))?;
                if cursor.as_deref() == Some(key.as_ref()) {
                    continue;
                }
                let name = String::from_utf8(key.to_vec())
                    .map_err(|e| StoreError::Serialization(format!("non UTF-8 key: {}", e)))?;
                page.push(name);
            }

            Ok(page)
        })
        .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.shared.records.load(Ordering::Relaxed))
    }
}
