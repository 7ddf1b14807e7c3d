//! Error types for linstore.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur in storage and view operations.
///
/// Bounds and invariant violations fail fast; nothing in this crate retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Index outside `[0, size)`.
    #[error("index out of bounds: index {index} is out of range for size {size}")]
    IndexOutOfBounds { index: u64, size: u64 },

    /// Non-zero value written outside a padded view's declared extent.
    #[error("invalid boundary write: non-zero value at index {index} outside extent {size}")]
    InvalidBoundaryWrite { index: u64, size: u64 },

    /// Value written through a conditional view fails its predicate.
    #[error("predicate violation: value rejected at index {index}")]
    PredicateViolation { index: u64 },

    /// Combined size of concatenated sources exceeds the maximum index.
    #[error("size overflow: {left} + {right} exceeds the maximum representable index")]
    SizeOverflow { left: u64, right: u64 },

    /// Malformed construction parameters (trim range, stride geometry, mask, shape).
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Coordinate has the wrong number of components for the accessor's shape.
    #[error("wrong coordinate rank: expected {expected}, got {actual}")]
    WrongCoordinateRank { expected: usize, actual: usize },

    /// Coordinate component outside its dimension.
    #[error("coordinate out of bounds: axis {axis} index {index} exceeds extent {extent}")]
    CoordinateOutOfBounds { axis: usize, index: u64, extent: u64 },

    /// Backing memory could not be reserved.
    #[error("allocation failed")]
    AllocationFailed(#[from] TryReserveError),

    /// I/O or external-database failure in a backing store.
    #[error("backing store failure")]
    Backing(#[from] BackingFailure),
}

/// Failure originating in an out-of-core or external backing medium.
///
/// Backing failures always propagate to the caller; policy (retry, degrade)
/// is a caller concern.
#[derive(Debug, Error)]
pub enum BackingFailure {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "relational")]
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backing(BackingFailure::Io(err))
    }
}

#[cfg(feature = "relational")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backing(BackingFailure::Sql(err))
    }
}

impl StoreError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        StoreError::Configuration {
            reason: reason.into(),
        }
    }
}
