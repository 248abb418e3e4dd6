//! Asset registry errors.

use armory_shared::types::AssetId;
use thiserror::Error;

use super::types::AssetStatus;
use crate::store::StoreError;

/// Errors raised by the asset registry.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset not found.
    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    /// Asset id already enrolled.
    #[error("Asset {0} is already registered")]
    AlreadyRegistered(AssetId),

    /// Status change not allowed by the asset lifecycle.
    #[error("Asset {asset_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The asset.
        asset_id: AssetId,
        /// Current status.
        from: AssetStatus,
        /// Rejected target status.
        to: AssetStatus,
    },

    /// Backing store failure.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AssetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ASSET_NOT_FOUND",
            Self::AlreadyRegistered(_) => "ASSET_ALREADY_REGISTERED",
            Self::InvalidTransition { .. } => "INVALID_ASSET_TRANSITION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
