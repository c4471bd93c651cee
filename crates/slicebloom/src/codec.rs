//! Portable binary layout for filters
//!
//! ```text
//! [8 bytes]  capacity                  u64, big-endian
//! [4 bytes]  false-positive target     IEEE-754 f32, big-endian
//! [8 bytes]  algorithm name length     u64, big-endian
//! [N bytes]  algorithm name            UTF-8, e.g. "sha3_256"
//! [8 bytes]  packed bit-array length   u64, big-endian
//! [M bytes]  packed bit array          bit 0 in the high bit of byte 0
//! ```
//!
//! The probability travels as an f32, so sizing re-derived on decode can
//! disagree with the encoder by a few bits; the payload is truncated or
//! zero-extended to the re-derived width. The element count is not part of
//! the layout and restarts at zero on decode.

use tracing::debug;

use crate::config::FilterConfig;
use crate::digest::HashAlgorithm;
use crate::error::FilterError;
use crate::filter::BloomFilter;

/// Serialize a filter into the binary layout
pub fn encode(filter: &BloomFilter) -> Vec<u8> {
    let name = filter.hash_algorithm().name().as_bytes();
    let payload = filter.packed_bits();

    let mut out = Vec::with_capacity(28 + name.len() + payload.len());
    out.extend_from_slice(&filter.capacity().to_be_bytes());
    out.extend_from_slice(&(filter.false_positive_probability() as f32).to_be_bytes());
    out.extend_from_slice(&(name.len() as u64).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Deserialize a filter from the binary layout
///
/// `fallback` substitutes for an embedded algorithm name that is not in the
/// registry.
///
/// # Errors
/// - `TruncatedInput` if any declared field extends past the input.
/// - `UnknownHashAlgorithm` if the name does not resolve and no fallback
///   was supplied.
/// - `InvalidConfiguration` if the decoded capacity/probability pair fails
///   sizing validation.
pub fn decode(bytes: &[u8], fallback: Option<HashAlgorithm>) -> Result<BloomFilter, FilterError> {
    decode_from(bytes, fallback, 0)
}

/// Deserialize a filter embedded at `base_offset` inside a larger buffer
///
/// # Errors
/// See [`decode`].
pub fn decode_from(
    bytes: &[u8],
    fallback: Option<HashAlgorithm>,
    base_offset: usize,
) -> Result<BloomFilter, FilterError> {
    let mut reader = ByteReader::new(bytes, base_offset);

    let capacity = reader.read_u64("capacity")?;
    let probability = reader.read_f32("false-positive probability")?;
    let name_len = reader.read_u64("algorithm name length")?;
    let name = reader.take(name_len, "algorithm name")?;

    let algorithm = match std::str::from_utf8(name).ok().and_then(HashAlgorithm::from_name) {
        Some(algorithm) => algorithm,
        None => fallback.ok_or_else(|| {
            FilterError::UnknownHashAlgorithm(String::from_utf8_lossy(name).into_owned())
        })?,
    };

    let payload_len = reader.read_u64("bit array length")?;
    let payload = reader.take(payload_len, "bit array")?;

    let config =
        FilterConfig::new(capacity, f64::from(probability)).with_hash_algorithm(algorithm);
    let mut filter = BloomFilter::new(config)?;

    let derived_bytes = filter.sizing().total_bytes();
    if payload.len() as u64 != derived_bytes {
        debug!(
            stored_bytes = payload.len(),
            derived_bytes,
            "bit payload width differs from re-derived sizing; reconciling"
        );
    }
    filter.load_packed_bits(payload);
    Ok(filter)
}

/// Bounded cursor over the input buffer
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Next `len` bytes of `field`, or `TruncatedInput`
    fn take(&mut self, len: u64, field: &'static str) -> Result<&'a [u8], FilterError> {
        if (self.remaining() as u64) < len {
            return Err(FilterError::TruncatedInput {
                field,
                needed: len,
                remaining: self.remaining() as u64,
            });
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.buf[start..self.pos])
    }

    fn read_u64(&mut self, field: &'static str) -> Result<u64, FilterError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8, field)?);
        Ok(u64::from_be_bytes(raw))
    }

    fn read_f32(&mut self, field: &'static str) -> Result<f32, FilterError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4, field)?);
        Ok(f32::from_be_bytes(raw))
    }
}
