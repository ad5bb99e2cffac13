//! Lock-free, insert-only bit array
//!
//! The only mutable state of the filter. Bits are packed into `AtomicU64`
//! words (bit `i` lives in word `i / 64`, position `i % 64`).
//!
//! ## Memory ordering
//!
//! - `set` is a `fetch_or` with `Release`
//! - `get` is a load with `Acquire`
//!
//! A reader that observes a bit as 1 also observes every write the setter
//! made before setting it. Concurrent `set` calls on the same word cannot
//! lose each other's bits because `fetch_or` is a single atomic RMW.
//!
//! There is no `clear`: bits only move 0 -> 1.

use bitvec::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::FilterError;

const WORD_BITS: usize = 64;

/// Fixed-size atomic bit array.
#[derive(Debug)]
pub struct BitSet {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl BitSet {
    /// Allocate `len` bits, all zero.
    pub fn new(len: usize) -> Result<Self, FilterError> {
        if len == 0 {
            return Err(FilterError::invalid("bit set length must be greater than 0"));
        }

        let word_count = len.div_ceil(WORD_BITS);
        let words = (0..word_count)
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self { words, len })
    }

    /// Number of addressable bits (m).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for a constructed set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the bit at `index` to 1.
    ///
    /// Idempotent. Returns `true` if the bit was previously 0.
    #[inline]
    pub fn set(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit index {index} out of range {}", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        let previous = self.words[index / WORD_BITS].fetch_or(mask, Ordering::Release);
        previous & mask == 0
    }

    /// Current value of the bit at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit index {index} out of range {}", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        self.words[index / WORD_BITS].load(Ordering::Acquire) & mask != 0
    }

    /// Number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// Fraction of bits set, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.len as f64
    }

    /// Point-in-time copy of the bits.
    ///
    /// Words are read one at a time, so a snapshot taken during concurrent
    /// inserts may include some of an insertion's bits but not others.
    pub fn snapshot(&self) -> BitVec<u64, Lsb0> {
        let raw: Vec<u64> = self
            .words
            .iter()
            .map(|w| w.load(Ordering::Acquire))
            .collect();
        let mut bits = BitVec::<u64, Lsb0>::from_vec(raw);
        bits.truncate(self.len);
        bits
    }
}
