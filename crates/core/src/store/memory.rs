//! In-memory stores guarded by `parking_lot` read-write locks.

use std::collections::BTreeMap;

use armory_shared::types::AssetId;
use parking_lot::RwLock;

use super::{AssetStore, EventStore, StoreError};
use crate::asset::AssetRecord;
use crate::ledger::{EventId, LedgerCursor, LedgerRecord, RecordDraft};

/// Ledger log held in a `Vec`; record `n` lives at index `n - 1`.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    records: RwLock<Vec<LedgerRecord>>,
}

impl InMemoryEventStore {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of appended records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

fn index_of(position: u64) -> Result<usize, StoreError> {
    usize::try_from(position)
        .map_err(|_| StoreError::Corrupted(format!("position {position} exceeds address space")))
}

impl EventStore for InMemoryEventStore {
    fn append(&self, draft: RecordDraft) -> Result<LedgerRecord, StoreError> {
        let mut records = self.records.write();
        let id = EventId(records.len() as u64 + 1);
        let record = draft.sequence(id);
        records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: EventId) -> Result<Option<LedgerRecord>, StoreError> {
        if id.0 == 0 {
            return Ok(None);
        }
        let index = index_of(id.0 - 1)?;
        Ok(self.records.read().get(index).cloned())
    }

    fn scan_range(&self, from: EventId, to: LedgerCursor) -> Result<Vec<LedgerRecord>, StoreError> {
        let records = self.records.read();
        let start = index_of(from.0.saturating_sub(1))?;
        let end = index_of(to.0)?.min(records.len());
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(records[start..end].to_vec())
    }

    fn head(&self) -> Result<LedgerCursor, StoreError> {
        Ok(LedgerCursor(self.records.read().len() as u64))
    }
}

/// Asset records keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    assets: RwLock<BTreeMap<AssetId, AssetRecord>>,
}

impl InMemoryAssetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for InMemoryAssetStore {
    fn get(&self, id: AssetId) -> Result<Option<AssetRecord>, StoreError> {
        Ok(self.assets.read().get(&id).cloned())
    }

    fn put(&self, record: AssetRecord) -> Result<(), StoreError> {
        self.assets.write().insert(record.asset.id, record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<AssetRecord>, StoreError> {
        Ok(self.assets.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EventPayload, StatusChangeDetails, EventKind, EventStatus};
    use armory_shared::types::{ActorId, BaseId};
    use chrono::{TimeZone, Utc};

    fn draft(note: &str) -> RecordDraft {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        RecordDraft {
            base_id: BaseId::from_u128(1),
            actor: ActorId::from_u128(2),
            occurred_at: at,
            recorded_at: at,
            payload: EventPayload::StatusChange(StatusChangeDetails {
                target: EventId(1),
                target_kind: EventKind::Purchase,
                from: EventStatus::Pending,
                to: EventStatus::Approved,
                note: Some(note.to_string()),
            }),
        }
    }

    #[test]
    fn test_append_assigns_monotonic_ids() {
        let store = InMemoryEventStore::new();
        assert_eq!(store.head().unwrap(), LedgerCursor::EMPTY);

        let first = store.append(draft("a")).unwrap();
        let second = store.append(draft("b")).unwrap();
        assert_eq!(first.id, EventId(1));
        assert_eq!(second.id, EventId(2));
        assert_eq!(store.head().unwrap(), LedgerCursor(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let store = InMemoryEventStore::new();
        store.append(draft("a")).unwrap();
        assert!(store.get(EventId(0)).unwrap().is_none());
        assert!(store.get(EventId(1)).unwrap().is_some());
        assert!(store.get(EventId(2)).unwrap().is_none());
    }

    #[test]
    fn test_scan_range_stops_at_cursor() {
        let store = InMemoryEventStore::new();
        store.append(draft("a")).unwrap();
        store.append(draft("b")).unwrap();
        let cursor = store.head().unwrap();
        store.append(draft("c")).unwrap();

        let seen = store.scan_range(EventId::FIRST, cursor).unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].id, EventId(2));

        let tail = store.scan_range(EventId(2), LedgerCursor(3)).unwrap();
        assert_eq!(tail.iter().map(|r| r.id.0).collect::<Vec<_>>(), vec![2, 3]);

        assert!(store.scan_range(EventId(3), LedgerCursor(2)).unwrap().is_empty());
        assert_eq!(store.scan_range(EventId::FIRST, LedgerCursor(99)).unwrap().len(), 3);
    }
}
