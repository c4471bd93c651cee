//! Salted digest expansion into per-slice bit indices
//!
//! One digest call yields several fixed-width index words; when a filter
//! probes more slices than one digest can cover, further digests are taken
//! under sequential 4-byte salts. Word width, salt sequence, and the modulo
//! reduction are all part of the wire-format contract: exporters and
//! importers must derive identical probe sequences from identical bytes.

use crate::digest::HashAlgorithm;
use crate::sizing::Sizing;

/// Expands value bytes into exactly one bit index per slice
#[derive(Clone, Debug)]
pub(crate) struct SliceIndexer {
    algorithm: HashAlgorithm,
    num_slices: usize,
    bits_per_slice: u64,
    word_bytes: usize,
    salts: Vec<[u8; 4]>,
}

impl SliceIndexer {
    pub(crate) fn new(algorithm: HashAlgorithm, sizing: &Sizing) -> Self {
        let word_bytes = index_word_bytes(sizing.bits_per_slice);
        let indices_per_digest = algorithm.digest_size() / word_bytes;
        let num_salts = (sizing.num_slices as usize).div_ceil(indices_per_digest);
        let salts = (0..num_salts as u32).map(|salt| salt.to_be_bytes()).collect();

        Self {
            algorithm,
            num_slices: sizing.num_slices as usize,
            bits_per_slice: sizing.bits_per_slice,
            word_bytes,
            salts,
        }
    }

    /// Probe indices for `value`, in slice order, each in `[0, bits_per_slice)`
    ///
    /// The final salt's digest may be only partially consumed.
    pub(crate) fn slice_indices(&self, value: &[u8]) -> Vec<u64> {
        let mut indices = Vec::with_capacity(self.num_slices);
        for salt in &self.salts {
            let digest = self.algorithm.digest_salted(salt, value);
            for chunk in digest.chunks_exact(self.word_bytes) {
                // The biased reduction is pinned by the wire format; an
                // unbiased scheme would change every probe sequence.
                indices.push(read_be_word(chunk) % self.bits_per_slice);
                if indices.len() == self.num_slices {
                    return indices;
                }
            }
        }
        indices
    }
}

/// Smallest fixed-width word able to index a slice of this width
fn index_word_bytes(bits_per_slice: u64) -> usize {
    if bits_per_slice < 1 << 16 {
        2
    } else if bits_per_slice < 1 << 32 {
        4
    } else {
        8
    }
}

/// Big-endian read of one index word
fn read_be_word(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .fold(0u64, |word, &byte| (word << 8) | u64::from(byte))
}
