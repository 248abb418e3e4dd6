//! Asset registry: the canonical set of individual assets and their status.
//!
//! The registry is written only as a side effect of committed ledger
//! records. Every accepted status change carries the id of the record
//! that caused it.

pub mod error;
pub mod registry;
pub mod types;

pub use error::AssetError;
pub use registry::AssetRegistry;
pub use types::{Asset, AssetCondition, AssetRecord, AssetStatus, AssetTransition, AssetType};
