//! Error types for filter sizing, insertion, and the binary codec

use thiserror::Error;

/// Errors surfaced by filter construction, `insert`, and decode
///
/// Every variant is terminal for the operation that raised it; nothing is
/// retried or swallowed internally.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Capacity exceeded: {elements} elements inserted > capacity {capacity}")]
    CapacityExceeded { elements: u64, capacity: u64 },

    #[error("Unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),

    #[error("Truncated input: {field} needs {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        field: &'static str,
        needed: u64,
        remaining: u64,
    },
}
