//! Sliced Bloom filter
//!
//! The bit array is split into `num_slices` equal slices and every insert
//! sets exactly one bit in each slice. A value is reported present only
//! when all of its probed bits are set, so an inserted value can never be
//! reported absent.

use tracing::debug;

use crate::bits::BitStore;
use crate::codec;
use crate::config::FilterConfig;
use crate::digest::HashAlgorithm;
use crate::error::FilterError;
use crate::hashing::SliceIndexer;
use crate::sizing::Sizing;

/// Probabilistic set-membership filter with a fixed capacity and
/// false-positive target
///
/// False positives occur with probability bounded by the configured target
/// while at most `capacity` elements are inserted; false negatives never
/// occur.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    config: FilterConfig,
    sizing: Sizing,
    indexer: SliceIndexer,
    bits: BitStore,
    elements_inserted: u64,
}

impl BloomFilter {
    /// Create an empty filter sized for `config`
    ///
    /// # Errors
    /// `InvalidConfiguration` if the capacity is zero or the probability is
    /// not strictly between 0 and 1.
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        let sizing = Sizing::calculate(config.capacity(), config.false_positive_probability())?;
        let indexer = SliceIndexer::new(config.hash_algorithm(), &sizing);
        debug!(
            capacity = config.capacity(),
            false_positive_probability = config.false_positive_probability(),
            hash_algorithm = %config.hash_algorithm(),
            num_slices = sizing.num_slices,
            bits_per_slice = sizing.bits_per_slice,
            "sized bloom filter"
        );

        Ok(Self {
            config,
            sizing,
            indexer,
            bits: BitStore::zeroed(sizing.total_bits() as usize),
            elements_inserted: 0,
        })
    }

    /// Build a filter for `config` and insert every value in input order
    ///
    /// # Errors
    /// Propagates the first construction or insertion failure.
    pub fn from_values<V: AsRef<[u8]>>(
        config: FilterConfig,
        values: &[V],
    ) -> Result<Self, FilterError> {
        let mut filter = Self::new(config)?;
        for value in values {
            filter.insert(value.as_ref())?;
        }
        Ok(filter)
    }

    /// Build a filter whose capacity is `capacity_proportion * values.len()`
    /// rounded up, then insert every value
    ///
    /// Uses the default digest algorithm; the conventional headroom is
    /// [`crate::DEFAULT_CAPACITY_PROPORTION`]. An empty collection derives
    /// capacity zero and therefore fails `InvalidConfiguration`.
    pub fn from_values_scaled<V: AsRef<[u8]>>(
        values: &[V],
        capacity_proportion: f64,
        false_positive_probability: f64,
    ) -> Result<Self, FilterError> {
        let capacity = (capacity_proportion * values.len() as f64).ceil() as u64;
        Self::from_values(
            FilterConfig::new(capacity, false_positive_probability),
            values,
        )
    }

    /// Insert a value
    ///
    /// Returns `true` iff every probed bit was already set before this
    /// call, i.e. the value was already indistinguishable from a member.
    /// A `false` return means at least one bit was newly set.
    ///
    /// # Errors
    /// `CapacityExceeded` once the element count has passed the configured
    /// capacity. The guard runs before any bit is touched, so the failing
    /// call leaves the filter exactly as it was.
    pub fn insert(&mut self, value: &[u8]) -> Result<bool, FilterError> {
        if self.elements_inserted > self.config.capacity() {
            return Err(FilterError::CapacityExceeded {
                elements: self.elements_inserted,
                capacity: self.config.capacity(),
            });
        }

        let mut already_present = true;
        for (slice, index) in self.indexer.slice_indices(value).into_iter().enumerate() {
            let offset = slice as u64 * self.sizing.bits_per_slice + index;
            already_present &= self.bits.set(offset as usize, true);
        }
        self.elements_inserted += 1;
        Ok(already_present)
    }

    /// Insert every value in order, collecting each outcome positionally
    ///
    /// A `CapacityExceeded` on one element does not stop the batch; later
    /// elements still get their own outcome.
    pub fn insert_all<V: AsRef<[u8]>>(&mut self, values: &[V]) -> Vec<Result<bool, FilterError>> {
        values.iter().map(|value| self.insert(value.as_ref())).collect()
    }

    /// Query membership
    ///
    /// `false` means the value was definitely never inserted; `true` means
    /// it may have been, with false positives bounded in expectation by the
    /// configured probability. Never mutates.
    pub fn contains(&self, value: &[u8]) -> bool {
        self.indexer
            .slice_indices(value)
            .into_iter()
            .enumerate()
            .all(|(slice, index)| {
                let offset = slice as u64 * self.sizing.bits_per_slice + index;
                self.bits.get(offset as usize)
            })
    }

    /// Number of successful inserts since construction or `clear`
    pub fn len(&self) -> u64 {
        self.elements_inserted
    }

    pub fn is_empty(&self) -> bool {
        self.elements_inserted == 0
    }

    /// Construction parameters
    pub fn config(&self) -> FilterConfig {
        self.config
    }

    /// Maximum number of elements the filter is sized for
    pub fn capacity(&self) -> u64 {
        self.config.capacity()
    }

    /// Configured false-positive probability
    pub fn false_positive_probability(&self) -> f64 {
        self.config.false_positive_probability()
    }

    /// Digest algorithm feeding the index expansion
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.config.hash_algorithm()
    }

    /// Derived geometry
    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn num_slices(&self) -> u32 {
        self.sizing.num_slices
    }

    pub fn bits_per_slice(&self) -> u64 {
        self.sizing.bits_per_slice
    }

    pub fn total_bits(&self) -> u64 {
        self.sizing.total_bits()
    }

    /// Number of set bits across all slices
    pub fn bits_set(&self) -> u64 {
        self.bits.count_ones() as u64
    }

    /// Fraction of bits set, 0.0 for a fresh filter
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.sizing.total_bits() as f64
    }

    /// Reset every bit and the element count, keeping the geometry
    pub fn clear(&mut self) {
        self.bits.zero();
        self.elements_inserted = 0;
    }

    /// True when `other` probes the same geometry with the same algorithm,
    /// so its bit image lines up with this one
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.sizing == other.sizing
            && self.config.hash_algorithm() == other.config.hash_algorithm()
    }

    /// Fold another filter's contents into this one (bitwise OR)
    ///
    /// Element counts are summed, so the merged count can pass this
    /// filter's capacity and make further `insert` calls fail.
    ///
    /// # Panics
    /// Panics if the filters are not compatible. Check `is_compatible`
    /// first.
    pub fn merge(&mut self, other: &BloomFilter) {
        assert!(
            self.is_compatible(other),
            "cannot merge filters with different sizing or hash algorithm"
        );
        self.bits.union_with(&other.bits);
        self.elements_inserted += other.elements_inserted;
    }

    /// Export as the portable binary layout
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Import a filter previously produced by [`BloomFilter::to_bytes`]
    ///
    /// `fallback` substitutes for an unrecognized embedded algorithm name.
    /// The element count restarts at zero; the layout does not carry it.
    ///
    /// # Errors
    /// See [`codec::decode`].
    pub fn from_bytes(
        bytes: &[u8],
        fallback: Option<HashAlgorithm>,
    ) -> Result<Self, FilterError> {
        codec::decode(bytes, fallback)
    }

    /// Import a filter embedded at `base_offset` inside a larger buffer
    ///
    /// # Errors
    /// See [`codec::decode`].
    pub fn from_bytes_at(
        bytes: &[u8],
        fallback: Option<HashAlgorithm>,
        base_offset: usize,
    ) -> Result<Self, FilterError> {
        codec::decode_from(bytes, fallback, base_offset)
    }

    /// Packed image of the bit array for the codec
    pub(crate) fn packed_bits(&self) -> Vec<u8> {
        self.bits.to_bytes()
    }

    /// Replace the bit array with a decoded payload, truncated or
    /// zero-extended to this filter's width
    pub(crate) fn load_packed_bits(&mut self, bytes: &[u8]) {
        self.bits = BitStore::from_bytes(self.sizing.total_bits() as usize, bytes);
    }
}
