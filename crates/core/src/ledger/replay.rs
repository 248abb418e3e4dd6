//! Folding a ledger prefix into the current state of every movement.
//!
//! Statuses are never stored on the movement record itself; they are the
//! result of applying every status-change record up to a cursor. The same
//! fold backs admission checks, projections and event listings.

use std::collections::BTreeMap;

use armory_shared::types::{ActorId, AssetId, BaseId};
use chrono::{DateTime, NaiveDate, Utc};

use super::event::{EventPayload, LedgerRecord};
use super::types::{EventId, EventKind, EventStatus, LedgerCursor};
use crate::asset::AssetType;

/// One applied status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStep {
    /// The status-change record.
    pub change: EventId,
    /// Status before.
    pub from: EventStatus,
    /// Status after.
    pub to: EventStatus,
    /// When the change occurred.
    pub at: DateTime<Utc>,
    /// Who made it (e.g. the approver).
    pub actor: ActorId,
}

/// A movement record together with its replayed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementState {
    /// The original movement record.
    pub record: LedgerRecord,
    /// Stored status after every applied change.
    pub status: EventStatus,
    /// Applied changes, oldest first.
    pub steps: Vec<StatusStep>,
}

impl MovementState {
    fn open(record: LedgerRecord) -> Option<Self> {
        let status = record.kind().initial_status()?;
        Some(Self {
            record,
            status,
            steps: Vec::new(),
        })
    }

    /// Returns the movement kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.record.kind()
    }

    /// Asset type moved.
    #[must_use]
    pub fn asset_type(&self) -> Option<AssetType> {
        self.record.payload.asset_type()
    }

    /// Units moved.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.record.payload.quantity().unwrap_or(0)
    }

    /// When the movement changed on-hand stock, if it has.
    ///
    /// Purchases settle on delivery, transfers on completion and
    /// expenditures on creation. Assignments never settle.
    #[must_use]
    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        let settling = match self.kind() {
            EventKind::Expenditure => return Some(self.record.occurred_at),
            EventKind::Purchase => EventStatus::Delivered,
            EventKind::Transfer => EventStatus::Completed,
            _ => return None,
        };
        self.steps
            .iter()
            .find(|step| step.to == settling)
            .map(|step| step.at)
    }

    /// Status as reported on `today`: an active assignment past its
    /// expected return date reads as `overdue`.
    #[must_use]
    pub fn effective_status(&self, today: NaiveDate) -> EventStatus {
        if self.status == EventStatus::Active
            && let EventPayload::Assignment(details) = &self.record.payload
            && details.expected_return_date.is_some_and(|due| due < today)
        {
            return EventStatus::Overdue;
        }
        self.status
    }

    /// Returns true for a transfer that has left the admission check but
    /// not yet moved stock.
    #[must_use]
    pub fn is_outstanding_transfer(&self) -> bool {
        self.kind() == EventKind::Transfer
            && matches!(self.status, EventStatus::Pending | EventStatus::InTransit)
    }

    /// Destination base of a transfer.
    #[must_use]
    pub fn to_base(&self) -> Option<BaseId> {
        self.record.payload.counterpart_base()
    }
}

/// Replayed movements at a fixed ledger version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerView {
    cursor: LedgerCursor,
    movements: BTreeMap<EventId, MovementState>,
}

impl LedgerView {
    /// Replays `records` (in id order) up to and including `cursor`.
    #[must_use]
    pub fn replay(records: &[LedgerRecord], cursor: LedgerCursor) -> Self {
        let mut movements: BTreeMap<EventId, MovementState> = BTreeMap::new();

        for record in records.iter().filter(|r| cursor.includes(r.id)) {
            match &record.payload {
                EventPayload::StatusChange(change) => {
                    if let Some(state) = movements.get_mut(&change.target) {
                        state.steps.push(StatusStep {
                            change: record.id,
                            from: change.from,
                            to: change.to,
                            at: record.occurred_at,
                            actor: record.actor,
                        });
                        state.status = change.to;
                    }
                }
                _ => {
                    if let Some(state) = MovementState::open(record.clone()) {
                        movements.insert(record.id, state);
                    }
                }
            }
        }

        Self { cursor, movements }
    }

    /// The ledger version this view reflects.
    #[must_use]
    pub const fn cursor(&self) -> LedgerCursor {
        self.cursor
    }

    /// Looks up one movement.
    #[must_use]
    pub fn movement(&self, id: EventId) -> Option<&MovementState> {
        self.movements.get(&id)
    }

    /// Iterates movements in id order.
    pub fn movements(&self) -> impl Iterator<Item = &MovementState> {
        self.movements.values()
    }

    /// The assignment still holding `asset_id`, if any.
    #[must_use]
    pub fn open_assignment(&self, asset_id: AssetId) -> Option<EventId> {
        self.movements().find_map(|state| match &state.record.payload {
            EventPayload::Assignment(d)
                if d.asset_id == asset_id && state.status == EventStatus::Active =>
            {
                Some(state.record.id)
            }
            _ => None,
        })
    }
}
