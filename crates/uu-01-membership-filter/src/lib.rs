//! # UU-01 Membership Filter
//!
//! Probabilistic pre-filter that sits in front of the authoritative username
//! store. Answers "definitely absent" without touching the store, and
//! "possibly present" when the store must be consulted.
//!
//! ## Architecture
//!
//! - `BitSet`: fixed-size atomic bit array, insert-only
//! - `HashFamily`: k deterministic MurmurHash3-based functions into `[0, m)`
//! - `MembershipFilter`: `insert` / `might_contain` over the two above
//! - `FilterConfig`: sizing from expected load and target false positive rate
//!
//! ## Invariants
//!
//! - **No false negatives**: if inserted, `might_contain()` MUST return true
//! - **Monotonic**: bits only go 0 -> 1; there is no removal
//! - **FPR**: (1 - e^(-kn/m))^k for n insertions
//!
//! ## Usage Example
//!
//! ```
//! use uu_01_membership_filter::MembershipFilter;
//!
//! let filter = MembershipFilter::new(100, 3).unwrap();
//! filter.insert("alice");
//!
//! assert!(filter.might_contain("alice"));
//! ```

pub mod domain;
pub mod error;

pub use domain::{
    BitSet, FilterConfig, FilterConfigBuilder, FilterParams, HashFamily, HashStrategy,
    MembershipFilter,
};
pub use error::FilterError;
