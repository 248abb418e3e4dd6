//! Ledger identifiers, event kinds and event statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Monotonic ledger record id, assigned by the event store starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    /// Id of the first record in any log.
    pub const FIRST: Self = Self(1);
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EVT-{:06}", self.0)
    }
}

/// A fixed ledger version: every record with id `<= cursor` is included.
///
/// Projections read against a cursor so that concurrent appends never leak
/// into a snapshot that is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LedgerCursor(pub u64);

impl LedgerCursor {
    /// The version before any record was appended.
    pub const EMPTY: Self = Self(0);

    /// Returns true if `id` is visible at this version.
    #[must_use]
    pub const fn includes(&self, id: EventId) -> bool {
        id.0 != 0 && id.0 <= self.0
    }
}

impl fmt::Display for LedgerCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Kind of a ledger record.
///
/// The first four are asset movements with their own status lifecycle. The
/// rest are bookkeeping records: status changes of movements and the
/// admin-only asset registry edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Acquisition from a vendor.
    Purchase,
    /// Movement between two bases.
    Transfer,
    /// Custody of one asset handed to a person.
    Assignment,
    /// Irreversible consumption or loss.
    Expenditure,
    /// Status transition of an earlier movement.
    StatusChange,
    /// New asset entered into the registry.
    AssetEnrolment,
    /// Manual registry status change (maintenance, retirement).
    AssetStatusChange,
}

impl EventKind {
    /// Movement kinds, in display order.
    pub const MOVEMENTS: [Self; 4] = [
        Self::Purchase,
        Self::Transfer,
        Self::Assignment,
        Self::Expenditure,
    ];

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Transfer => "transfer",
            Self::Assignment => "assignment",
            Self::Expenditure => "expenditure",
            Self::StatusChange => "status_change",
            Self::AssetEnrolment => "asset_enrolment",
            Self::AssetStatusChange => "asset_status_change",
        }
    }

    /// Returns true for the four movement kinds.
    #[must_use]
    pub const fn is_movement(&self) -> bool {
        matches!(
            self,
            Self::Purchase | Self::Transfer | Self::Assignment | Self::Expenditure
        )
    }

    /// Status a movement starts in; `None` for bookkeeping records.
    #[must_use]
    pub const fn initial_status(&self) -> Option<EventStatus> {
        match self {
            Self::Purchase | Self::Transfer => Some(EventStatus::Pending),
            Self::Assignment => Some(EventStatus::Active),
            Self::Expenditure => Some(EventStatus::Recorded),
            Self::StatusChange | Self::AssetEnrolment | Self::AssetStatusChange => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purchase" => Ok(Self::Purchase),
            "transfer" => Ok(Self::Transfer),
            "assignment" => Ok(Self::Assignment),
            "expenditure" => Ok(Self::Expenditure),
            "status_change" => Ok(Self::StatusChange),
            "asset_enrolment" => Ok(Self::AssetEnrolment),
            "asset_status_change" => Ok(Self::AssetStatusChange),
            _ => Err(UnknownVariant::new("event kind", s)),
        }
    }
}

/// Status of a movement. Which values apply depends on the [`EventKind`].
///
/// - Purchase: pending, approved, delivered
/// - Transfer: pending, in_transit, completed, rejected
/// - Assignment: active, returned (overdue is computed, never stored)
/// - Expenditure: recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Awaiting approval or dispatch.
    Pending,
    /// Purchase approved, not yet received.
    Approved,
    /// Purchase received; stock counted from here.
    Delivered,
    /// Transfer dispatched from the source base.
    InTransit,
    /// Transfer received; stock moved.
    Completed,
    /// Transfer refused before dispatch.
    Rejected,
    /// Assignment open.
    Active,
    /// Assignment closed, asset back in stock.
    Returned,
    /// Active assignment past its expected return date.
    Overdue,
    /// Expenditure booked.
    Recorded,
}

impl EventStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
            Self::InTransit => "in_transit",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Active => "active",
            Self::Returned => "returned",
            Self::Overdue => "overdue",
            Self::Recorded => "recorded",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "delivered" => Ok(Self::Delivered),
            "in_transit" => Ok(Self::InTransit),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            "active" => Ok(Self::Active),
            "returned" => Ok(Self::Returned),
            "overdue" => Ok(Self::Overdue),
            "recorded" => Ok(Self::Recorded),
            _ => Err(UnknownVariant::new("event status", s)),
        }
    }
}
