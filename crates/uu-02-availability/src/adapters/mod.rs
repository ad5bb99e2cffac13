//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the `UsernameStore` port.
//!
//! ## Adapters
//!
//! - `InMemoryUsernameStore` - ordered in-process map, for tests and ephemeral runs
//! - `RocksDbUsernameStore` - durable store (feature `rocksdb`)

pub mod in_memory;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

pub use in_memory::InMemoryUsernameStore;

#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{RocksDbStoreConfig, RocksDbUsernameStore};
