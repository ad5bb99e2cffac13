//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use uu_01_membership_filter::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .expected_usernames(50_000)
//!     .target_fpr(0.001)
//!     .build()
//!     .expect("valid config");
//!
//! let params = config.params();
//! assert!(params.expected_fpr <= 0.0011);
//! ```

use serde::{Deserialize, Serialize};

use super::hash_functions::{HashStrategy, MAX_HASH_COUNT};
use super::parameters::{calculate_fpr, calculate_optimal_parameters, FilterParams};
use crate::error::FilterError;

/// Largest filter accepted by validation (2^34 bits = 2 GiB).
pub const MAX_FILTER_BITS: usize = 1 << 34;

/// Reject filters larger than [`MAX_FILTER_BITS`].
pub fn check_size(size_bits: usize) -> Result<(), FilterError> {
    if size_bits > MAX_FILTER_BITS {
        return Err(FilterError::FilterTooLarge {
            size: size_bits,
            max: MAX_FILTER_BITS,
        });
    }
    Ok(())
}

/// Membership filter configuration
///
/// m and k are derived from `expected_usernames` and `target_fpr` unless
/// overridden explicitly with `size_bits` / `hash_count`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Number of usernames the filter is sized for (n)
    pub expected_usernames: usize,
    /// Acceptable false positive rate at `expected_usernames` load
    pub target_fpr: f64,
    /// Explicit filter size in bits (m)
    pub size_bits: Option<usize>,
    /// Explicit number of hash functions (k)
    pub hash_count: Option<usize>,
    /// How the k indices are derived
    pub strategy: HashStrategy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_usernames: 1_000_000,
            target_fpr: 0.01,
            size_bits: None,
            hash_count: None,
            strategy: HashStrategy::DoubleHashing,
        }
    }
}

impl FilterConfig {
    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.expected_usernames == 0 {
            return Err(FilterError::invalid("expected_usernames cannot be 0"));
        }

        if !(self.target_fpr > 0.0 && self.target_fpr < 1.0) {
            return Err(FilterError::InvalidFpr {
                fpr: self.target_fpr,
            });
        }

        if self.size_bits == Some(0) {
            return Err(FilterError::invalid("size_bits cannot be 0"));
        }

        if let Some(k) = self.hash_count {
            if k == 0 || k > MAX_HASH_COUNT {
                return Err(FilterError::invalid(format!(
                    "hash_count must be between 1 and {MAX_HASH_COUNT}"
                )));
            }
        }

        // Derived sizes are bounded too, not only explicit overrides
        check_size(self.params().size_bits)
    }

    /// Resolve m and k, honouring explicit overrides.
    pub fn params(&self) -> FilterParams {
        let optimal = calculate_optimal_parameters(self.expected_usernames, self.target_fpr);
        let size_bits = self.size_bits.unwrap_or(optimal.size_bits);
        let hash_count = self.hash_count.unwrap_or(optimal.hash_count);

        FilterParams {
            size_bits,
            hash_count,
            expected_fpr: calculate_fpr(size_bits, self.expected_usernames, hash_count),
        }
    }

    /// Builder-style method to set the expected number of usernames
    pub fn with_expected_usernames(mut self, n: usize) -> Self {
        self.expected_usernames = n;
        self
    }

    /// Builder-style method to set the target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }
}

/// Fluent builder for [`FilterConfig`]
#[derive(Default)]
pub struct FilterConfigBuilder {
    expected_usernames: Option<usize>,
    target_fpr: Option<f64>,
    size_bits: Option<usize>,
    hash_count: Option<usize>,
    strategy: Option<HashStrategy>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_usernames(mut self, n: usize) -> Self {
        self.expected_usernames = Some(n);
        self
    }

    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Fix m instead of deriving it
    pub fn size_bits(mut self, bits: usize) -> Self {
        self.size_bits = Some(bits);
        self
    }

    /// Fix k instead of deriving it
    pub fn hash_count(mut self, k: usize) -> Self {
        self.hash_count = Some(k);
        self
    }

    pub fn strategy(mut self, strategy: HashStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> FilterConfig {
        let defaults = FilterConfig::default();

        FilterConfig {
            expected_usernames: self.expected_usernames.unwrap_or(defaults.expected_usernames),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            size_bits: self.size_bits.or(defaults.size_bits),
            hash_count: self.hash_count.or(defaults.hash_count),
            strategy: self.strategy.unwrap_or(defaults.strategy),
        }
    }
}
