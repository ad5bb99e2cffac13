//! Sizing math for the membership filter
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k
//! - m = -n*ln(fpr) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)           -- optimal hash functions

use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

use super::hash_functions::MAX_HASH_COUNT;

/// Resolved filter dimensions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Expected false positive rate once the expected number of usernames is loaded
    pub expected_fpr: f64,
}

/// Calculate optimal parameters for `num_elements` usernames at `target_fpr`.
///
/// `num_elements == 0` yields the smallest valid filter (m = 1, k = 1).
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> FilterParams {
    if num_elements == 0 {
        return FilterParams {
            size_bits: 1,
            hash_count: 1,
            expected_fpr: 1.0,
        };
    }

    let m = minimum_bits(num_elements, target_fpr).max(1);
    let k = optimal_k(m, num_elements).clamp(1, MAX_HASH_COUNT);

    FilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, num_elements, k),
    }
}

/// False positive rate of a filter with `m` bits, `n` insertions and `k` functions.
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Optimal k for given m and n.
pub fn optimal_k(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((m as f64 / n as f64) * LN_2).round() as usize
}

/// Minimum m that keeps `n` insertions at or below `target_fpr`.
pub fn minimum_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    (-(n as f64) * target_fpr.ln() / ln2_squared).ceil() as usize
}
