//! Per-kind status machines for movement records.
//!
//! - Purchase: pending → approved → delivered, or pending → delivered
//! - Transfer: pending → in_transit → completed, or pending → rejected
//! - Assignment: active → returned
//! - Expenditure: terminal at creation
//!
//! `overdue` is a reporting status computed on read and never a target.

use super::error::LedgerError;
use super::types::{EventId, EventKind, EventStatus};

/// Stateless transition table lookups.
pub struct StatusWorkflow;

impl StatusWorkflow {
    /// Statuses reachable from `from` in a single step for `kind`.
    #[must_use]
    pub const fn allowed_next(kind: EventKind, from: EventStatus) -> &'static [EventStatus] {
        use EventStatus::{Active, Approved, Completed, Delivered, InTransit, Pending, Rejected, Returned};

        match (kind, from) {
            (EventKind::Purchase, Pending) => &[Approved, Delivered],
            (EventKind::Purchase, Approved) => &[Delivered],
            (EventKind::Transfer, Pending) => &[InTransit, Rejected],
            (EventKind::Transfer, InTransit) => &[Completed],
            (EventKind::Assignment, Active) => &[Returned],
            _ => &[],
        }
    }

    /// Returns true if `kind` may move from `from` to `to`.
    #[must_use]
    pub fn can_transition(kind: EventKind, from: EventStatus, to: EventStatus) -> bool {
        Self::allowed_next(kind, from).contains(&to)
    }

    /// Returns true if no transition leaves `status`.
    #[must_use]
    pub const fn is_terminal(kind: EventKind, status: EventStatus) -> bool {
        Self::allowed_next(kind, status).is_empty()
    }

    /// Fails with `InvalidTransition` unless the table allows the step.
    pub fn validate(
        event_id: EventId,
        kind: EventKind,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<(), LedgerError> {
        if Self::can_transition(kind, from, to) {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransition {
                event_id,
                kind,
                from,
                to,
            })
        }
    }
}
