//! Signed on-hand effects of settled movements.

use armory_shared::types::BaseId;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::asset::AssetType;
use crate::ledger::{EventId, EventKind, LedgerView, MovementState};

/// Why on-hand stock changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCause {
    /// Delivered purchase (+).
    Purchase,
    /// Completed transfer, destination side (+).
    TransferIn,
    /// Completed transfer, source side (−).
    TransferOut,
    /// Expenditure (−).
    Expenditure,
}

impl EffectCause {
    /// Returns true if the effect adds stock.
    #[must_use]
    pub const fn is_increase(&self) -> bool {
        matches!(self, Self::Purchase | Self::TransferIn)
    }
}

/// One change to a (base, asset type) on-hand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceEffect {
    /// Movement that caused it.
    pub event: EventId,
    /// Affected base.
    pub base_id: BaseId,
    /// Affected asset type.
    pub asset_type: AssetType,
    /// Direction and reason.
    pub cause: EffectCause,
    /// Units moved (unsigned).
    pub quantity: u32,
    /// When the effect took place.
    pub at: DateTime<Utc>,
}

impl BalanceEffect {
    /// Signed change to on-hand stock.
    #[must_use]
    pub fn delta(&self) -> i64 {
        let quantity = i64::from(self.quantity);
        if self.cause.is_increase() { quantity } else { -quantity }
    }

    /// Effects of one movement; empty until the movement has settled.
    ///
    /// A completed transfer yields its debit and its credit together.
    #[must_use]
    pub fn of(state: &MovementState) -> Vec<Self> {
        let (Some(at), Some(asset_type)) = (state.settled_at(), state.asset_type()) else {
            return Vec::new();
        };
        let effect = |base_id, cause| Self {
            event: state.record.id,
            base_id,
            asset_type,
            cause,
            quantity: state.quantity(),
            at,
        };

        match state.kind() {
            EventKind::Purchase => vec![effect(state.record.base_id, EffectCause::Purchase)],
            EventKind::Expenditure => vec![effect(state.record.base_id, EffectCause::Expenditure)],
            EventKind::Transfer => match state.to_base() {
                Some(to) => vec![
                    effect(state.record.base_id, EffectCause::TransferOut),
                    effect(to, EffectCause::TransferIn),
                ],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Effects of every settled movement in `view`, in movement id order.
    #[must_use]
    pub fn collect(view: &LedgerView) -> Vec<Self> {
        view.movements().flat_map(Self::of).collect()
    }
}
