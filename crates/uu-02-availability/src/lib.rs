//! # UU-02 Availability
//!
//! Username availability resolver. A `MembershipFilter` answers most checks
//! for fresh usernames without a store round-trip; every "possibly present"
//! answer and every claim goes to the authoritative `UsernameStore`.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): `Username`, `UsernameRecord`, `CheckOutcome`
//! - **Ports Layer** (`ports/`)
//!   - `AvailabilityApi`: Driving port (check / claim)
//!   - `UsernameStore`: Driven port (authoritative store)
//! - **Service Layer** (`service/`)
//!   - `AvailabilityService`: Implements `AvailabilityApi`
//!   - `populate_filter`: replays the store into a fresh filter at startup
//! - **Adapters Layer** (`adapters/`): `InMemoryUsernameStore`,
//!   `RocksDbUsernameStore` (feature `rocksdb`)
//! - **Events Layer** (`events/`): typed requests, responses and error codes
//! - **Handler Layer** (`handler/`): `RequestHandler`, maps errors to statuses
//!
//! ## Invariants
//!
//! - A filter miss is final: the username is available
//! - A filter hit is never final: the store decides
//! - A claim writes the store first, then the filter; a conflict leaves the
//!   filter untouched, a failed or timed-out write still marks it
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use uu_01_membership_filter::MembershipFilter;
//! use uu_02_availability::{AvailabilityApi, AvailabilityService, InMemoryUsernameStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryUsernameStore::new());
//! let filter = Arc::new(MembershipFilter::with_capacity(10_000, 0.01).unwrap());
//! let service = AvailabilityService::new(store, filter);
//!
//! service.claim("carol").await.unwrap();
//! assert!(!service.check("carol").await.unwrap().available);
//! # });
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::InMemoryUsernameStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbStoreConfig, RocksDbUsernameStore};
pub use domain::{CheckOutcome, Resolution, Username, UsernameRecord};
pub use error::{AvailabilityError, StoreError};
pub use handler::RequestHandler;
pub use metrics::{AvailabilityMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{AvailabilityApi, SaveOutcome, UsernameStore};
pub use service::{populate_filter, AvailabilityService, BootstrapReport, DEFAULT_PAGE_SIZE};
