//! Concurrent Bloom filter over usernames
//!
//! INVARIANTS:
//! - No false negatives: after `insert(u)` returns, `might_contain(u)` is true
//!   on every thread that observes it
//! - Monotonic: bits never clear, so a positive answer stays positive
//! - m and k are fixed at construction
//!
//! Both `insert` and `might_contain` take `&self`; the filter is meant to be
//! shared behind an `Arc` by every request task.

use bitvec::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::bitset::BitSet;
use super::config::{check_size, FilterConfig};
use super::hash_functions::{HashFamily, HashStrategy};
use super::parameters::{calculate_fpr, calculate_optimal_parameters};
use crate::error::FilterError;

/// Approximate-membership filter for claimed usernames.
#[derive(Debug)]
pub struct MembershipFilter {
    bits: BitSet,
    hashes: HashFamily,
    /// Number of `insert` calls (n), duplicates included
    insertions: AtomicUsize,
}

impl MembershipFilter {
    /// Filter with `m` bits and `k` double-hashed functions.
    pub fn new(m: usize, k: usize) -> Result<Self, FilterError> {
        Self::with_strategy(m, k, HashStrategy::DoubleHashing)
    }

    /// Filter with `m` bits, `k` functions and an explicit hash construction.
    pub fn with_strategy(m: usize, k: usize, strategy: HashStrategy) -> Result<Self, FilterError> {
        check_size(m)?;
        let hashes = HashFamily::new(k, m, strategy)?;
        let bits = BitSet::new(m)?;

        debug!(size_bits = m, hash_count = k, ?strategy, "membership filter allocated");

        Ok(Self {
            bits,
            hashes,
            insertions: AtomicUsize::new(0),
        })
    }

    /// Filter sized for `expected_usernames` at `target_fpr`.
    pub fn with_capacity(expected_usernames: usize, target_fpr: f64) -> Result<Self, FilterError> {
        if !(target_fpr > 0.0 && target_fpr < 1.0) {
            return Err(FilterError::InvalidFpr { fpr: target_fpr });
        }
        let params = calculate_optimal_parameters(expected_usernames, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    /// Filter built from a validated configuration.
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let params = config.params();
        Self::with_strategy(params.size_bits, params.hash_count, config.strategy)
    }

    /// Record `username` as present.
    ///
    /// Always succeeds. Safe to call concurrently with other inserts and lookups.
    pub fn insert(&self, username: &str) {
        for pos in self.hashes.indices(username.as_bytes()) {
            self.bits.set(pos);
        }
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Test whether `username` might have been inserted.
    ///
    /// - `false`: definitely never inserted
    /// - `true`: inserted, or a false positive
    pub fn might_contain(&self, username: &str) -> bool {
        self.hashes
            .indices(username.as_bytes())
            .into_iter()
            .all(|pos| self.bits.get(pos))
    }

    /// Filter size in bits (m)
    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions (k)
    pub fn hash_count(&self) -> usize {
        self.hashes.hash_count()
    }

    pub fn hash_family(&self) -> &HashFamily {
        &self.hashes
    }

    /// Number of `insert` calls so far
    pub fn insertions(&self) -> usize {
        self.insertions.load(Ordering::Relaxed)
    }

    /// Number of bits currently set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set
    pub fn fill_ratio(&self) -> f64 {
        self.bits.fill_ratio()
    }

    /// Estimated false positive rate at the current load.
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k, with n counting duplicate inserts.
    pub fn estimated_fpr(&self) -> f64 {
        calculate_fpr(self.size_bits(), self.insertions(), self.hash_count())
    }

    /// Point-in-time copy of the bit array.
    pub fn snapshot(&self) -> BitVec<u64, Lsb0> {
        self.bits.snapshot()
    }
}
