// SPDX-License-Identifier: MIT
// Usage faults raised at the edges of the API.

use thiserror::Error;

/// Caller programming errors. Degenerate inputs (empty strings, scores below
/// the cutoff) are never errors; they score 0 or are filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuzzError {
    /// Scorer name that does not map to a [`RatioKind`](crate::RatioKind)
    #[error("unknown ratio kind: {0}")]
    UnknownRatioKind(String),

    /// Legacy integer code outside 1..=10
    #[error("unknown ratio type code: {0}")]
    UnknownRatioCode(i32),
}

/// Result type for fallible parsing and dispatch
pub type Result<T> = std::result::Result<T, FuzzError>;
