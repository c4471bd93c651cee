//! Filter configuration
//!
//! A `FilterConfig` is plain data: the requested capacity, the target
//! false-positive probability, and the digest algorithm. Range checks
//! happen when geometry is calculated at filter construction.

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;

/// Default false-positive probability
pub const DEFAULT_FALSE_POSITIVE_PROBABILITY: f64 = 0.001;

/// Default capacity headroom for [`crate::BloomFilter::from_values_scaled`]
pub const DEFAULT_CAPACITY_PROPORTION: f64 = 1.5;

/// Construction parameters for one filter, immutable once built
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    capacity: u64,
    false_positive_probability: f64,
    hash_algorithm: HashAlgorithm,
}

impl FilterConfig {
    /// Configuration with the default digest algorithm
    pub fn new(capacity: u64, false_positive_probability: f64) -> Self {
        Self {
            capacity,
            false_positive_probability,
            hash_algorithm: HashAlgorithm::default(),
        }
    }

    /// Builder-style method to select the digest algorithm
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Maximum number of elements the filter is sized for
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Target false-positive probability
    pub fn false_positive_probability(&self) -> f64 {
        self.false_positive_probability
    }

    /// Digest algorithm feeding the index expansion
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }
}
