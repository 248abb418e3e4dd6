//! Mutation requests accepted by the ledger engine.
//!
//! Requests carry user-supplied fields only. Ids, timestamps that default
//! to the engine clock, and fields derived from the registry are filled in
//! by the engine.

use armory_shared::types::{AssetId, BaseId, Money};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{EventId, EventKind, EventStatus};
use crate::asset::{AssetCondition, AssetStatus, AssetType};

/// Record a new purchase at `base_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Receiving base.
    pub base_id: BaseId,
    /// Item description.
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units ordered; must be positive.
    pub quantity: u32,
    /// Price per unit; must not be negative.
    pub unit_price: Money,
    /// Supplier.
    pub vendor: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request a transfer from `from_base` to `to_base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Source base.
    pub from_base: BaseId,
    /// Destination base; must differ from the source.
    pub to_base: BaseId,
    /// Item description.
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units to move; must be positive.
    pub quantity: u32,
    /// Expected arrival date.
    #[serde(default)]
    pub estimated_arrival: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Hand one registered asset to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Asset to hand over; must be `available`.
    pub asset_id: AssetId,
    /// Person taking custody.
    pub assigned_to: String,
    /// Reason for the assignment.
    pub purpose: String,
    /// When the asset is due back; not before the assignment date.
    #[serde(default)]
    pub expected_return_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Record units consumed or lost at `base_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureRequest {
    /// Base drawing down stock.
    pub base_id: BaseId,
    /// Item description.
    pub asset_name: String,
    /// Category counted in balances.
    pub asset_type: AssetType,
    /// Units consumed; must be positive and not exceed the available balance.
    pub quantity: u32,
    /// Why the units were expended.
    pub reason: String,
    /// Book cost; must not be negative.
    pub cost: Money,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Enrol a new individually tracked asset at `base_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolAssetRequest {
    /// Owning base.
    pub base_id: BaseId,
    /// Display name.
    pub name: String,
    /// Asset category.
    pub asset_type: AssetType,
    /// Manufacturer serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Physical condition.
    #[serde(default)]
    pub condition: AssetCondition,
    /// Book value; must not be negative.
    pub value: Money,
    /// Date the asset entered inventory.
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
}

/// Change an asset's registry status by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStatusRequest {
    /// The asset.
    pub asset_id: AssetId,
    /// New status; `assigned` is only reachable through an assignment.
    pub to: AssetStatus,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Any request that creates a new ledger record other than a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventRequest {
    /// See [`PurchaseRequest`].
    Purchase(PurchaseRequest),
    /// See [`TransferRequest`].
    Transfer(TransferRequest),
    /// See [`AssignmentRequest`].
    Assignment(AssignmentRequest),
    /// See [`ExpenditureRequest`].
    Expenditure(ExpenditureRequest),
    /// See [`EnrolAssetRequest`].
    #[serde(rename = "asset_enrolment")]
    EnrolAsset(EnrolAssetRequest),
    /// See [`AssetStatusRequest`].
    #[serde(rename = "asset_status_change")]
    ChangeAssetStatus(AssetStatusRequest),
}

impl EventRequest {
    /// Kind of the record this request produces.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Purchase(_) => EventKind::Purchase,
            Self::Transfer(_) => EventKind::Transfer,
            Self::Assignment(_) => EventKind::Assignment,
            Self::Expenditure(_) => EventKind::Expenditure,
            Self::EnrolAsset(_) => EventKind::AssetEnrolment,
            Self::ChangeAssetStatus(_) => EventKind::AssetStatusChange,
        }
    }
}

/// Progress an earlier movement to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    /// The movement record.
    pub target: EventId,
    /// Requested status.
    pub to: EventStatus,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl StatusChangeRequest {
    /// Creates a status change without a note.
    #[must_use]
    pub const fn new(target: EventId, to: EventStatus) -> Self {
        Self {
            target,
            to,
            note: None,
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
