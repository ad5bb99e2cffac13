//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Atomic bit array
//! - Hash family
//! - Membership filter
//! - Parameter calculations
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod bitset;
pub mod config;
pub mod hash_functions;
pub mod membership_filter;
pub mod parameters;

pub use bitset::BitSet;
pub use config::{check_size, FilterConfig, FilterConfigBuilder, MAX_FILTER_BITS};
pub use hash_functions::{murmur_hash, HashFamily, HashStrategy, DEFAULT_SEED_BASE, MAX_HASH_COUNT};
pub use membership_filter::MembershipFilter;
pub use parameters::{
    calculate_fpr, calculate_optimal_parameters, minimum_bits, optimal_k, FilterParams,
};
