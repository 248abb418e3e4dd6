//! Ledger rejection reasons.
//!
//! Every rejected mutation returns one of these and appends nothing. Each
//! variant maps onto a [`RejectionKind`] so callers can branch on the
//! category without matching every variant.

use armory_shared::error::AppError;
use armory_shared::types::{ActorId, AssetId, BaseId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use super::types::{EventId, EventKind, EventStatus};
use crate::asset::{AssetError, AssetType};
use crate::auth::{Action, Role, Target};
use crate::error::UnknownVariant;
use crate::store::StoreError;

/// Rejection categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Malformed input, rejected before any state check.
    Validation,
    /// Not enough stock at the drawing base.
    InsufficientBalance,
    /// Status machine violation.
    InvalidTransition,
    /// Actor lacks the capability for the target.
    Forbidden,
    /// Referenced base, asset or record is absent.
    NotFound,
    /// Lock contention or duplicate identity.
    Conflict,
    /// Backing store failure.
    Storage,
}

impl RejectionKind {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InsufficientBalance | Self::InvalidTransition => 422,
            Self::Storage => 500,
        }
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Quantity must be positive.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    /// A monetary field is negative.
    #[error("{field} cannot be negative")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A required text field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Source and destination of a transfer are the same base.
    #[error("Transfer source and destination are both base {0}")]
    SameBaseTransfer(BaseId),

    /// Date range with `start > end`.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// Expected return date precedes the assignment date.
    #[error("Expected return date {expected} is before assignment date {assigned}")]
    ReturnBeforeAssignment {
        /// Requested return date.
        expected: NaiveDate,
        /// Date of the assignment.
        assigned: NaiveDate,
    },

    /// Status change dated before the record it progresses.
    #[error("Status change cannot precede {target}")]
    ChangePrecedesEvent {
        /// The record being progressed.
        target: EventId,
    },

    /// Business timestamp later than the engine clock.
    #[error("Event dated {occurred_at} is in the future (now {now})")]
    FutureDated {
        /// Requested business timestamp.
        occurred_at: DateTime<Utc>,
        /// Engine clock at decision time.
        now: DateTime<Utc>,
    },

    /// Status change aimed at a record without a status lifecycle.
    #[error("{0} is not a movement and has no status")]
    NotTransitionable(EventId),

    /// `assigned` set by hand instead of through an assignment.
    #[error("Assets become assigned only through an assignment")]
    AssignmentRequired,

    /// Unknown enum value in user input.
    #[error(transparent)]
    UnknownValue(#[from] UnknownVariant),

    // ========== Balance Errors ==========
    /// Drawing more than the base holds.
    #[error(
        "Insufficient {asset_type} at base {base_id}: requested {requested}, available {available}"
    )]
    InsufficientBalance {
        /// Drawing base.
        base_id: BaseId,
        /// Asset type drawn.
        asset_type: AssetType,
        /// Units requested.
        requested: u32,
        /// Units available at decision time.
        available: i64,
    },

    // ========== State Errors ==========
    /// Status change not allowed for the record's kind.
    #[error("Invalid status transition for {kind} {event_id}: {from} -> {to}")]
    InvalidTransition {
        /// The record being progressed.
        event_id: EventId,
        /// Its kind.
        kind: EventKind,
        /// Current status.
        from: EventStatus,
        /// Rejected target status.
        to: EventStatus,
    },

    /// Manual release of an asset still held through an assignment.
    #[error("Asset {0} is held through an assignment and must be returned")]
    ReturnRequired(AssetId),

    /// New assignment of an asset whose earlier assignment is still open.
    #[error("Asset {asset_id} is still held through assignment {assignment}")]
    AssignmentOpen {
        /// The asset.
        asset_id: AssetId,
        /// The open assignment.
        assignment: EventId,
    },

    /// Asset registry rejection.
    #[error(transparent)]
    Asset(#[from] AssetError),

    // ========== Authorization Errors ==========
    /// Actor's role does not cover the target.
    #[error("Actor {actor} ({role}) may not perform {action} on {target}")]
    Forbidden {
        /// The actor.
        actor: ActorId,
        /// Their role.
        role: Role,
        /// Attempted action.
        action: Action,
        /// Bases involved.
        target: Target,
    },

    // ========== Lookup Errors ==========
    /// Base not found.
    #[error("Base not found: {0}")]
    BaseNotFound(BaseId),

    /// Ledger record not found.
    #[error("Ledger event not found: {0}")]
    EventNotFound(EventId),

    // ========== Concurrency Errors ==========
    /// A mutation queue stayed busy past the lock timeout.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Storage Errors ==========
    /// Backing store failure.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    /// Returns the rejection category.
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::ZeroQuantity
            | Self::NegativeAmount { .. }
            | Self::MissingField(_)
            | Self::SameBaseTransfer(_)
            | Self::InvalidDateRange { .. }
            | Self::ReturnBeforeAssignment { .. }
            | Self::ChangePrecedesEvent { .. }
            | Self::FutureDated { .. }
            | Self::NotTransitionable(_)
            | Self::AssignmentRequired
            | Self::UnknownValue(_) => RejectionKind::Validation,
            Self::InsufficientBalance { .. } => RejectionKind::InsufficientBalance,
            Self::InvalidTransition { .. }
            | Self::ReturnRequired(_)
            | Self::AssignmentOpen { .. }
            | Self::Asset(AssetError::InvalidTransition { .. }) => RejectionKind::InvalidTransition,
            Self::Forbidden { .. } => RejectionKind::Forbidden,
            Self::BaseNotFound(_) | Self::EventNotFound(_) | Self::Asset(AssetError::NotFound(_)) => {
                RejectionKind::NotFound
            }
            Self::ConcurrentModification | Self::Asset(AssetError::AlreadyRegistered(_)) => {
                RejectionKind::Conflict
            }
            Self::Storage(_) | Self::Asset(AssetError::Storage(_)) => RejectionKind::Storage,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::SameBaseTransfer(_) => "SAME_BASE_TRANSFER",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::ReturnBeforeAssignment { .. } => "RETURN_BEFORE_ASSIGNMENT",
            Self::ChangePrecedesEvent { .. } => "CHANGE_PRECEDES_EVENT",
            Self::FutureDated { .. } => "FUTURE_DATED",
            Self::NotTransitionable(_) => "NOT_TRANSITIONABLE",
            Self::AssignmentRequired => "ASSIGNMENT_REQUIRED",
            Self::UnknownValue(_) => "UNKNOWN_VALUE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReturnRequired(_) => "RETURN_REQUIRED",
            Self::AssignmentOpen { .. } => "ASSIGNMENT_OPEN",
            Self::Asset(err) => err.error_code(),
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::BaseNotFound(_) => "BASE_NOT_FOUND",
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            RejectionKind::Validation => Self::Validation(message),
            RejectionKind::InsufficientBalance | RejectionKind::InvalidTransition => {
                Self::BusinessRule(message)
            }
            RejectionKind::Forbidden => Self::Forbidden(message),
            RejectionKind::NotFound => Self::NotFound(message),
            RejectionKind::Conflict => Self::Conflict(message),
            RejectionKind::Storage => Self::Internal(message),
        }
    }
}
