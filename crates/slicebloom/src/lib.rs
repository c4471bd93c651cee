//! # slicebloom
//!
//! Sliced Bloom filter with capacity-derived sizing and a portable binary
//! export format.
//!
//! ## Layout
//!
//! - `sizing`: derives slice count and slice width from (capacity, p)
//! - `digest`: the closed registry of digest algorithms
//! - `config`: construction parameters
//! - `filter`: the filter itself (insert / contains / merge / diagnostics)
//! - `codec`: the binary wire layout (encode / decode)
//!
//! The bit array is partitioned into `num_slices` equal slices and every
//! insert sets exactly one bit per slice, so a membership query never
//! reports an inserted value absent. False positives stay bounded in
//! expectation by the configured probability while the filter holds at
//! most `capacity` elements.
//!
//! Filters serialize to a compact binary layout that embeds capacity,
//! probability, and the digest algorithm name, so any implementation of
//! the same layout can read them back.
//!
//! ## Usage
//!
//! ```
//! use slicebloom::{BloomFilter, FilterConfig};
//!
//! # fn main() -> Result<(), slicebloom::FilterError> {
//! let mut filter = BloomFilter::new(FilterConfig::new(1000, 0.001))?;
//! filter.insert(b"alpha")?;
//! assert!(filter.contains(b"alpha"));
//! assert!(!filter.contains(b"omega"));
//!
//! let bytes = filter.to_bytes();
//! let restored = BloomFilter::from_bytes(&bytes, None)?;
//! assert!(restored.contains(b"alpha"));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod digest;
pub mod error;
pub mod filter;
pub mod sizing;

mod bits;
mod hashing;

// Re-exports for convenience
pub use config::{FilterConfig, DEFAULT_CAPACITY_PROPORTION, DEFAULT_FALSE_POSITIVE_PROBABILITY};
pub use digest::HashAlgorithm;
pub use error::FilterError;
pub use filter::BloomFilter;
pub use sizing::Sizing;
