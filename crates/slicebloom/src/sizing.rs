//! Filter geometry from capacity and target false-positive probability
//!
//! Formulas:
//! - num_slices     = ceil(-log2(p))
//! - necessary_bits = capacity * (-log2(p) / ln 2)
//! - bits_per_slice = ceil(necessary_bits / num_slices)

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Derived filter geometry, fixed for the lifetime of a filter
///
/// The bit array is `num_slices * bits_per_slice` wide and every insert
/// sets exactly one bit per slice, so the total width is always evenly
/// divisible by the slice count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizing {
    /// Number of equal partitions, one probed bit each
    pub num_slices: u32,
    /// Width of one partition in bits
    pub bits_per_slice: u64,
}

impl Sizing {
    /// Calculate geometry for `capacity` elements at probability `p`
    ///
    /// The result is a pure function of its inputs; exporters and importers
    /// of the binary format must agree on it bit for bit.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `capacity` is zero, `p` is not strictly
    /// between 0 and 1, or the derived bit array is too wide for u64
    /// offsets.
    pub fn calculate(capacity: u64, p: f64) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidConfiguration(
                "capacity must be greater than zero".to_string(),
            ));
        }
        // The comparison also throws out NaN and the infinities.
        if !(p > 0.0 && p < 1.0) {
            return Err(FilterError::InvalidConfiguration(format!(
                "false-positive probability must be strictly between 0 and 1, got {p}"
            )));
        }

        let slice_exponent = -p.log2();
        let num_slices = slice_exponent.ceil() as u32;
        let necessary_bits = capacity as f64 * (slice_exponent / LN_2);
        let bits_per_slice = (necessary_bits / num_slices as f64).ceil();

        // Geometry must stay addressable by u64 bit offsets; past that the
        // float cast saturates and the slice product overflows. Decode
        // re-derives sizing from untrusted headers, so both fail typed.
        if !bits_per_slice.is_finite() || bits_per_slice >= u64::MAX as f64 {
            return Err(FilterError::InvalidConfiguration(format!(
                "capacity {capacity} at probability {p} derives a slice wider than u64"
            )));
        }
        let bits_per_slice = bits_per_slice as u64;
        if u64::from(num_slices).checked_mul(bits_per_slice).is_none() {
            return Err(FilterError::InvalidConfiguration(format!(
                "capacity {capacity} at probability {p} derives more bits than u64 can address"
            )));
        }

        Ok(Self {
            num_slices,
            bits_per_slice,
        })
    }

    /// Total width of the bit array
    pub fn total_bits(&self) -> u64 {
        u64::from(self.num_slices) * self.bits_per_slice
    }

    /// Width of the packed byte image of the bit array
    pub fn total_bytes(&self) -> u64 {
        self.total_bits().div_ceil(8)
    }
}
