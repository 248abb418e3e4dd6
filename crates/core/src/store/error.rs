//! Store error types.

use thiserror::Error;

/// Failures reported by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot serve the request right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored data violates an expectation of the store itself.
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}
