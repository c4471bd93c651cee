//! Fixed-width bit store backing one filter
//!
//! Bit offset 0 lives in the most significant bit of byte 0, so the packed
//! image is byte-identical to the exported wire payload. Bits past the
//! logical width of a partially used trailing byte are always zero.

use bitvec::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BitStore {
    bits: BitVec<u8, Msb0>,
}

impl BitStore {
    /// All-zero store of exactly `len` bits
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Msb0; 0; len],
        }
    }

    pub(crate) fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Write the bit at `index`, returning its prior state
    pub(crate) fn set(&mut self, index: usize, value: bool) -> bool {
        self.bits.replace(index, value)
    }

    pub(crate) fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub(crate) fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Zero every bit, keeping the width
    pub(crate) fn zero(&mut self) {
        self.bits.fill(false);
    }

    /// Packed byte image, most significant bit first
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.bits.as_raw_slice().to_vec()
    }

    /// Rebuild a store of exactly `len` bits from a packed image
    ///
    /// Input longer than `len` bits is truncated; shorter input leaves the
    /// remaining bits zero.
    pub(crate) fn from_bytes(len: usize, bytes: &[u8]) -> Self {
        let mut store = Self::zeroed(len);
        let source = bytes.view_bits::<Msb0>();
        let common = len.min(source.len());
        store.bits[..common].copy_from_bitslice(&source[..common]);
        store
    }

    /// Bitwise OR of an equal-width store into this one
    pub(crate) fn union_with(&mut self, other: &BitStore) {
        debug_assert_eq!(self.bits.len(), other.bits.len());
        let ours = self.bits.as_raw_mut_slice();
        let theirs = other.bits.as_raw_slice();
        for (dst, src) in ours.iter_mut().zip(theirs.iter()) {
            *dst |= *src;
        }
    }
}
