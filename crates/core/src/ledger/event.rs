//! Ledger records: a shared envelope around a kind-specific payload.

use armory_shared::types::{ActorId, AssetId, BaseId, Money};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::types::{EventId, EventKind, EventStatus};
use crate::asset::{Asset, AssetStatus, AssetType};

/// Acquisition of `quantity` units from a vendor at the envelope base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDetails {
    /// Item description (e.g. "M4A1 Rifle").
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units ordered.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Money,
    /// Supplier.
    pub vendor: String,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl PurchaseDetails {
    /// `quantity × unit_price`, `None` on overflow.
    #[must_use]
    pub fn total_cost(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Movement of `quantity` units from the envelope base to `to_base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    /// Item description.
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units moved.
    pub quantity: u32,
    /// Destination base.
    pub to_base: BaseId,
    /// Expected arrival date.
    pub estimated_arrival: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Custody of one registered asset handed to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetails {
    /// Asset handed over.
    pub asset_id: AssetId,
    /// Type of the asset, copied from the registry.
    pub asset_type: AssetType,
    /// Person taking custody.
    pub assigned_to: String,
    /// Reason for the assignment.
    pub purpose: String,
    /// When the asset is due back.
    pub expected_return_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Irreversible consumption or loss of `quantity` units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureDetails {
    /// Item description.
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units consumed.
    pub quantity: u32,
    /// Why the units were expended (training, operation, loss).
    pub reason: String,
    /// Book cost of the expended units.
    pub cost: Money,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Status transition of an earlier movement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeDetails {
    /// The movement being progressed.
    pub target: EventId,
    /// Kind of the target movement.
    pub target_kind: EventKind,
    /// Status before the change.
    pub from: EventStatus,
    /// Status after the change.
    pub to: EventStatus,
    /// Free-text note (approval remarks, rejection reason).
    pub note: Option<String>,
}

/// A new asset entered into the registry as `available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEnrolmentDetails {
    /// The asset as enrolled.
    pub asset: Asset,
}

/// A manual registry status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStatusChangeDetails {
    /// The asset.
    pub asset_id: AssetId,
    /// Status before the change.
    pub from: AssetStatus,
    /// Status after the change.
    pub to: AssetStatus,
    /// Free-text reason.
    pub reason: Option<String>,
}

/// Kind-specific part of a ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// See [`PurchaseDetails`].
    Purchase(PurchaseDetails),
    /// See [`TransferDetails`].
    Transfer(TransferDetails),
    /// See [`AssignmentDetails`].
    Assignment(AssignmentDetails),
    /// See [`ExpenditureDetails`].
    Expenditure(ExpenditureDetails),
    /// See [`StatusChangeDetails`].
    StatusChange(StatusChangeDetails),
    /// See [`AssetEnrolmentDetails`].
    AssetEnrolment(AssetEnrolmentDetails),
    /// See [`AssetStatusChangeDetails`].
    AssetStatusChange(AssetStatusChangeDetails),
}

impl EventPayload {
    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Purchase(_) => EventKind::Purchase,
            Self::Transfer(_) => EventKind::Transfer,
            Self::Assignment(_) => EventKind::Assignment,
            Self::Expenditure(_) => EventKind::Expenditure,
            Self::StatusChange(_) => EventKind::StatusChange,
            Self::AssetEnrolment(_) => EventKind::AssetEnrolment,
            Self::AssetStatusChange(_) => EventKind::AssetStatusChange,
        }
    }

    /// Asset type moved or touched, if the record concerns one.
    #[must_use]
    pub const fn asset_type(&self) -> Option<AssetType> {
        match self {
            Self::Purchase(d) => Some(d.asset_type),
            Self::Transfer(d) => Some(d.asset_type),
            Self::Assignment(d) => Some(d.asset_type),
            Self::Expenditure(d) => Some(d.asset_type),
            Self::AssetEnrolment(d) => Some(d.asset.asset_type),
            Self::StatusChange(_) | Self::AssetStatusChange(_) => None,
        }
    }

    /// Units moved by a movement record. Assignments always move one.
    #[must_use]
    pub const fn quantity(&self) -> Option<u32> {
        match self {
            Self::Purchase(d) => Some(d.quantity),
            Self::Transfer(d) => Some(d.quantity),
            Self::Assignment(_) => Some(1),
            Self::Expenditure(d) => Some(d.quantity),
            Self::StatusChange(_) | Self::AssetEnrolment(_) | Self::AssetStatusChange(_) => None,
        }
    }

    /// Destination base of a transfer.
    #[must_use]
    pub const fn counterpart_base(&self) -> Option<BaseId> {
        match self {
            Self::Transfer(d) => Some(d.to_base),
            _ => None,
        }
    }
}

/// An immutable, sequenced ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Monotonic id.
    pub id: EventId,
    /// Base the record belongs to; the source side for transfers.
    pub base_id: BaseId,
    /// Who issued the mutation.
    pub actor: ActorId,
    /// Business timestamp; balance effects are dated from it.
    pub occurred_at: DateTime<Utc>,
    /// When the engine accepted the record.
    pub recorded_at: DateTime<Utc>,
    /// Kind-specific data.
    pub payload: EventPayload,
}

impl LedgerRecord {
    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Returns true if `base_id` is the record base or a transfer destination.
    #[must_use]
    pub fn touches_base(&self, base_id: BaseId) -> bool {
        self.base_id == base_id || self.payload.counterpart_base() == Some(base_id)
    }
}

/// A record that has passed every check and awaits its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// See [`LedgerRecord::base_id`].
    pub base_id: BaseId,
    /// See [`LedgerRecord::actor`].
    pub actor: ActorId,
    /// See [`LedgerRecord::occurred_at`].
    pub occurred_at: DateTime<Utc>,
    /// See [`LedgerRecord::recorded_at`].
    pub recorded_at: DateTime<Utc>,
    /// See [`LedgerRecord::payload`].
    pub payload: EventPayload,
}

impl RecordDraft {
    /// Seals the draft with the id chosen by the event store.
    #[must_use]
    pub fn sequence(self, id: EventId) -> LedgerRecord {
        LedgerRecord {
            id,
            base_id: self.base_id,
            actor: self.actor,
            occurred_at: self.occurred_at,
            recorded_at: self.recorded_at,
            payload: self.payload,
        }
    }
}
