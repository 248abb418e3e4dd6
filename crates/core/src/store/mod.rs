//! Persistence seams for the ledger and the asset registry.
//!
//! The core names only the operations it needs. The event store is
//! append-only and keyed by a monotonic [`EventId`]; the asset store is a
//! keyed mutable map.
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │          EventStore          │   │          AssetStore          │
//! ├──────────────────────────────┤   ├──────────────────────────────┤
//! │ append(draft) -> record      │   │ get(id) -> Option<record>    │
//! │ get(id) -> Option<record>    │   │ put(record)                  │
//! │ scan_range(from, cursor)     │   │ list()                       │
//! │ head() -> cursor             │   │                              │
//! └──────────────────────────────┘   └──────────────────────────────┘
//! ```

mod error;
mod memory;

pub use error::StoreError;
pub use memory::{InMemoryAssetStore, InMemoryEventStore};

use std::fmt;

use armory_shared::types::AssetId;

use crate::asset::AssetRecord;
use crate::ledger::{EventId, LedgerCursor, LedgerRecord, RecordDraft};

/// Append-only ledger log.
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Assigns the next id to `draft` and appends it.
    fn append(&self, draft: RecordDraft) -> Result<LedgerRecord, StoreError>;

    /// Returns a single record.
    fn get(&self, id: EventId) -> Result<Option<LedgerRecord>, StoreError>;

    /// Returns records with ids in `from..=to`, in id order.
    ///
    /// Records appended after `to` was taken are never returned.
    fn scan_range(&self, from: EventId, to: LedgerCursor) -> Result<Vec<LedgerRecord>, StoreError>;

    /// Returns the cursor of the most recent record.
    fn head(&self) -> Result<LedgerCursor, StoreError>;
}

/// Keyed store of current asset state.
pub trait AssetStore: Send + Sync + fmt::Debug {
    /// Returns one asset record.
    fn get(&self, id: AssetId) -> Result<Option<AssetRecord>, StoreError>;

    /// Inserts or replaces an asset record.
    fn put(&self, record: AssetRecord) -> Result<(), StoreError>;

    /// Returns every asset record.
    fn list(&self) -> Result<Vec<AssetRecord>, StoreError>;
}
