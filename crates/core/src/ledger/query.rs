//! Read model for activity listings.

use armory_shared::types::{ActorId, BaseId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::{EventPayload, LedgerRecord};
use super::replay::LedgerView;
use super::types::{EventId, EventKind, EventStatus};
use crate::asset::AssetType;

/// Structured listing filter. Every set field must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Record kind.
    #[serde(default)]
    pub kind: Option<EventKind>,
    /// Base on either side of the record.
    #[serde(default)]
    pub base_id: Option<BaseId>,
    /// Asset type moved.
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    /// Effective status (movements only).
    #[serde(default)]
    pub status: Option<EventStatus>,
}

impl EventFilter {
    /// Returns true if `view` passes every set criterion.
    #[must_use]
    pub fn matches(&self, view: &EventView) -> bool {
        self.kind.is_none_or(|kind| view.kind == kind)
            && self
                .base_id
                .is_none_or(|base| view.base_id == base || view.counterpart_base_id == Some(base))
            && self.asset_type.is_none_or(|t| view.asset_type == Some(t))
            && self.status.is_none_or(|s| view.status == Some(s))
    }
}

/// A ledger record with its computed status, as shown in activity lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    /// Record id.
    pub id: EventId,
    /// Record kind.
    pub kind: EventKind,
    /// Record base; the source side for transfers.
    pub base_id: BaseId,
    /// Transfer destination.
    pub counterpart_base_id: Option<BaseId>,
    /// Asset type moved.
    pub asset_type: Option<AssetType>,
    /// Units moved.
    pub quantity: Option<u32>,
    /// Who issued the record.
    pub actor: ActorId,
    /// Business timestamp.
    pub occurred_at: DateTime<Utc>,
    /// Acceptance timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Effective status for movements, `overdue` included.
    pub status: Option<EventStatus>,
    /// Who made the latest status change, if any (e.g. the approver).
    pub last_changed_by: Option<ActorId>,
    /// Kind-specific data.
    pub payload: EventPayload,
}

impl EventView {
    /// Builds the view of `record` against a replay of the same ledger version.
    #[must_use]
    pub fn build(record: &LedgerRecord, ledger: &LedgerView, today: NaiveDate) -> Self {
        let movement = ledger.movement(record.id);
        Self {
            id: record.id,
            kind: record.kind(),
            base_id: record.base_id,
            counterpart_base_id: record.payload.counterpart_base(),
            asset_type: record.payload.asset_type(),
            quantity: record.payload.quantity(),
            actor: record.actor,
            occurred_at: record.occurred_at,
            recorded_at: record.recorded_at,
            status: movement.map(|state| state.effective_status(today)),
            last_changed_by: movement.and_then(|state| state.steps.last().map(|step| step.actor)),
            payload: record.payload.clone(),
        }
    }
}
