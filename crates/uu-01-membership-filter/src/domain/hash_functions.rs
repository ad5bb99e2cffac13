//! Hash family for the membership filter
//!
//! Uses MurmurHash3 (x64, 128-bit, lower 64 bits) with fixed seeds so the
//! mapping from username to bit positions is identical across restarts.
//!
//! Two constructions are available:
//! - `DoubleHashing`: index(i) = (h1 + i * h2') mod m, where h2' = h2 mod m
//!   (1 when that is 0), two hashes per element
//! - `Independent`: index(i) = h_i mod m, one seeded hash per function

use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::FilterError;

/// Seed of the first hash function. Function `i` uses `DEFAULT_SEED_BASE + i`.
pub const DEFAULT_SEED_BASE: u32 = 0x5EED_0000;

/// Upper bound on k.
pub const MAX_HASH_COUNT: usize = 32;

/// How the k indices are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashStrategy {
    /// Kirsch-Mitzenmacher double hashing: two base hashes per element.
    #[default]
    DoubleHashing,
    /// One full hash per function.
    Independent,
}

impl HashStrategy {
    /// Parse the names accepted in configuration (`double`, `independent`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "double" | "double_hashing" => Some(HashStrategy::DoubleHashing),
            "independent" | "seeded" => Some(HashStrategy::Independent),
            _ => None,
        }
    }
}

/// Hash an element with MurmurHash3 using the given seed.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);

    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Deterministic family of k hash functions over `[0, m)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFamily {
    k: usize,
    m: usize,
    strategy: HashStrategy,
    seeds: Vec<u32>,
}

impl HashFamily {
    /// Build a family of `k` functions over `m` positions.
    pub fn new(k: usize, m: usize, strategy: HashStrategy) -> Result<Self, FilterError> {
        if k == 0 || k > MAX_HASH_COUNT {
            return Err(FilterError::invalid(format!(
                "hash count must be between 1 and {MAX_HASH_COUNT}, got {k}"
            )));
        }
        if m == 0 {
            return Err(FilterError::invalid("filter size must be greater than 0"));
        }

        let seed_count = match strategy {
            HashStrategy::DoubleHashing => 2,
            HashStrategy::Independent => k,
        };
        let seeds = (0..seed_count as u32)
            .map(|i| DEFAULT_SEED_BASE.wrapping_add(i))
            .collect();

        Ok(Self {
            k,
            m,
            strategy,
            seeds,
        })
    }

    /// Number of functions (k).
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Size of the output range (m).
    pub fn range(&self) -> usize {
        self.m
    }

    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Seeds in function order.
    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Position produced by function `i` for `element`.
    ///
    /// # Panics
    /// Panics if `i >= k`.
    pub fn index(&self, element: &[u8], i: usize) -> usize {
        assert!(i < self.k, "hash function index {i} out of range {}", self.k);
        match self.strategy {
            HashStrategy::DoubleHashing => {
                let h1 = murmur_hash(element, self.seeds[0]);
                let h2 = murmur_hash(element, self.seeds[1]);
                self.combine(h1, h2, i)
            }
            HashStrategy::Independent => {
                (murmur_hash(element, self.seeds[i]) % self.m as u64) as usize
            }
        }
    }

    /// All k positions for `element`, in function order.
    pub fn indices(&self, element: &[u8]) -> Vec<usize> {
        match self.strategy {
            HashStrategy::DoubleHashing => {
                // Base hashes computed once and shared by every function
                let h1 = murmur_hash(element, self.seeds[0]);
                let h2 = murmur_hash(element, self.seeds[1]);
                (0..self.k).map(|i| self.combine(h1, h2, i)).collect()
            }
            HashStrategy::Independent => self
                .seeds
                .iter()
                .map(|&seed| (murmur_hash(element, seed) % self.m as u64) as usize)
                .collect(),
        }
    }

    /// (h1 + i * step) mod m, with step = h2 mod m forced nonzero so the k
    /// positions never collapse onto one bit.
    #[inline]
    fn combine(&self, h1: u64, h2: u64, i: usize) -> usize {
        let m = self.m as u64;
        let step = match h2 % m {
            0 => 1,
            step => step,
        };
        let hash = (h1 % m) as u128 + i as u128 * step as u128;
        (hash % m as u128) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_murmur3_hash_deterministic() {
        let element = b"alice";

        assert_eq!(
            murmur_hash(element, DEFAULT_SEED_BASE),
            murmur_hash(element, DEFAULT_SEED_BASE),
            "Same input with same seed must produce same output"
        );
    }

    #[test]
    fn test_murmur3_different_seed_different_output() {
        let element = b"alice";

        assert_ne!(
            murmur_hash(element, DEFAULT_SEED_BASE),
            murmur_hash(element, DEFAULT_SEED_BASE + 1),
            "Different seeds must produce different outputs"
        );
    }

    #[test]
    fn test_family_rejects_degenerate_parameters() {
        assert!(HashFamily::new(0, 100, HashStrategy::DoubleHashing).is_err());
        assert!(HashFamily::new(3, 0, HashStrategy::DoubleHashing).is_err());
        assert!(HashFamily::new(MAX_HASH_COUNT + 1, 100, HashStrategy::Independent).is_err());
    }

    #[test]
    fn test_seed_count_follows_strategy() {
        let double = HashFamily::new(7, 1000, HashStrategy::DoubleHashing).unwrap();
        let independent = HashFamily::new(7, 1000, HashStrategy::Independent).unwrap();

        assert_eq!(double.seeds().len(), 2);
        assert_eq!(independent.seeds().len(), 7);
        assert_eq!(independent.seeds()[0], DEFAULT_SEED_BASE);
        assert_eq!(independent.seeds()[6], DEFAULT_SEED_BASE + 6);
    }

    #[test]
    fn test_index_agrees_with_indices() {
        for strategy in [HashStrategy::DoubleHashing, HashStrategy::Independent] {
            let family = HashFamily::new(5, 997, strategy).unwrap();
            let all = family.indices(b"carol");

            assert_eq!(all.len(), 5);
            for (i, &pos) in all.iter().enumerate() {
                assert_eq!(family.index(b"carol", i), pos);
            }
        }
    }

    #[test]
    fn test_positions_in_range_and_varied() {
        let family = HashFamily::new(7, 10_000, HashStrategy::DoubleHashing).unwrap();
        let positions = family.indices(b"some_username");

        assert!(positions.iter().all(|&p| p < 10_000));

        let unique: HashSet<_> = positions.iter().collect();
        assert!(unique.len() >= 3, "Hash functions should produce varied positions");
    }

    #[test]
    fn test_double_hashing_step_never_zero() {
        // Prime m: any nonzero step yields k distinct positions
        let m = 61;
        let family = HashFamily::new(5, m, HashStrategy::DoubleHashing).unwrap();
        let degenerate = (0..10_000)
            .map(|i| format!("user_{}", i))
            .find(|name| murmur_hash(name.as_bytes(), family.seeds()[1]) % m as u64 == 0)
            .expect("some name has h2 divisible by m");

        let positions = family.indices(degenerate.as_bytes());
        let unique: HashSet<_> = positions.iter().collect();

        assert_eq!(unique.len(), 5, "positions collapsed for {}: {:?}", degenerate, positions);
    }

    #[test]
    fn test_families_with_same_parameters_are_equal() {
        let a = HashFamily::new(4, 512, HashStrategy::Independent).unwrap();
        let b = HashFamily::new(4, 512, HashStrategy::Independent).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.indices(b"dave"), b.indices(b"dave"));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(HashStrategy::parse("double"), Some(HashStrategy::DoubleHashing));
        assert_eq!(HashStrategy::parse(" Independent "), Some(HashStrategy::Independent));
        assert_eq!(HashStrategy::parse("sha256"), None);
    }

    #[test]
    fn test_hash_uniformity() {
        // 10 buckets over m=1000; expect ~700 hits per bucket
        let m = 1000;
        let k = 7;
        let mut counts = vec![0usize; 10];

        for strategy in [HashStrategy::DoubleHashing, HashStrategy::Independent] {
            counts.iter_mut().for_each(|c| *c = 0);
            let family = HashFamily::new(k, m, strategy).unwrap();

            for i in 0..1000 {
                let element = format!("user_{}", i);
                for pos in family.indices(element.as_bytes()) {
                    counts[pos / 100] += 1;
                }
            }

            for (bucket, count) in counts.iter().enumerate() {
                assert!(
                    (350..=1050).contains(count),
                    "{:?}: bucket {} has {} entries, expected ~700",
                    strategy,
                    bucket,
                    count
                );
            }
        }
    }
}
