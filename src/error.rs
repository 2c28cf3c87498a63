//! Errors reported by fallible tree operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// The result type of fallible map and set operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error from a map or set operation.
///
/// A failed operation leaves the container exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An element was to be erased through the past-the-end cursor.
    #[error("cannot erase through the end cursor")]
    InvalidCursor,

    /// An insertion was attempted while the container already held as many elements as it may.
    #[error("container cannot hold more than {max} elements")]
    CapacityExceeded {
        /// The container's element limit.
        max: usize,
    },

    /// Storage for a new node could not be obtained.
    #[error("node allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}
