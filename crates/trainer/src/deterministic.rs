//! Deterministic utilities for reproducible training.
//!
//! LCG-based RNG for dataset synthesis, an integer hash for row ordering,
//! and the tie-breaking key for split selection. No `std` randomness, no
//! floating point: identical seeds give identical models on every platform.

use std::num::Wrapping;

/// Linear Congruential Generator (glibc constants)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: i64) -> Self {
        Self {
            state: Wrapping(seed.abs() % Self::MODULUS),
        }
    }

    /// Next pseudo-random value in [0, MODULUS)
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 & (Self::MODULUS - 1)).abs()
    }

    /// Uniform value in [0, max)
    pub fn next_range(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 0;
        }
        self.next_i64() % max
    }

    /// Uniform micro-scaled value in [0, 1_000_000), standing in for a unit
    /// float draw
    pub fn next_unit_micro(&mut self) -> i64 {
        (self.next_i64() * 1_000_000) / Self::MODULUS
    }

    /// Bernoulli draw with micro-scaled probability `p_micro`
    pub fn next_bernoulli(&mut self, p_micro: i64) -> i64 {
        i64::from(self.next_unit_micro() < p_micro)
    }
}

/// Deterministic row hash for shuffle ordering (xxhash-style mixing in pure
/// i64 arithmetic)
pub fn row_hash(data: &[i64], seed: i64) -> i64 {
    const PRIME1: i64 = 0x9E3779B185EBCA87_u64 as i64;
    const PRIME2: i64 = 0xC2B2AE3D27D4EB4F_u64 as i64;
    const PRIME3: i64 = 0x165667B19E3779F9_u64 as i64;
    const PRIME5: i64 = 0x85EBCA77C2B2AE63_u64 as i64;

    let mut h = seed.wrapping_add(PRIME5);

    for &val in data {
        h = h.wrapping_add(val.wrapping_mul(PRIME3));
        h = h.rotate_left(17).wrapping_mul(PRIME2);
    }

    h ^= h >> 33;
    h = h.wrapping_mul(PRIME1);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME2);
    h ^= h >> 32;

    h
}

/// Tie-breaking key for split selection: when gains are equal the split with
/// the smaller (feature, threshold, node) triple wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: i64,
    pub node_id: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: i64, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            node_id,
        }
    }
}
