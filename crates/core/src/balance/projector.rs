//! Opening/closing balance projection.

use std::cmp::Reverse;

use armory_shared::types::BaseId;
use chrono::{DateTime, NaiveDate, Utc};

use super::effect::{BalanceEffect, EffectCause};
use super::types::{AssetTypeFilter, BalanceSnapshot, BaseScope, DateRange, Position};
use crate::asset::AssetType;
use crate::ledger::{EventKind, EventStatus, LedgerView};

/// Pure projection functions over a [`LedgerView`].
///
/// Projecting the same view with the same arguments always yields the same
/// snapshot; nothing is read from a clock or written anywhere.
pub struct BalanceProjector;

impl BalanceProjector {
    /// Computes dashboard figures for `scope` and `asset_type` over `range`.
    ///
    /// Effects dated before `range.start()` form the opening balance;
    /// effects inside the range are tallied per cause. Assignments never
    /// move on-hand stock and are only counted.
    #[must_use]
    pub fn project(
        view: &LedgerView,
        scope: BaseScope,
        asset_type: AssetTypeFilter,
        range: DateRange,
        evaluated_on: NaiveDate,
    ) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot {
            scope,
            asset_type,
            range,
            cursor: view.cursor(),
            evaluated_on,
            opening_balance: 0,
            closing_balance: 0,
            net_movement: 0,
            purchases: 0,
            transfers_in: 0,
            transfers_out: 0,
            expended: 0,
            assigned: 0,
            overdue_assignments: 0,
        };

        let in_scope = |effect: &BalanceEffect| {
            scope.includes(effect.base_id) && asset_type.matches(effect.asset_type)
        };

        for effect in BalanceEffect::collect(view).iter().filter(|e| in_scope(e)) {
            let date = effect.at.date_naive();
            if date < range.start() {
                snapshot.opening_balance += effect.delta();
                continue;
            }
            if date > range.end() {
                continue;
            }

            let quantity = i64::from(effect.quantity);
            match effect.cause {
                EffectCause::Purchase => snapshot.purchases += quantity,
                EffectCause::TransferIn => snapshot.transfers_in += quantity,
                EffectCause::TransferOut => snapshot.transfers_out += quantity,
                EffectCause::Expenditure => snapshot.expended += quantity,
            }
        }

        let assignments = view.movements().filter(|state| {
            state.kind() == EventKind::Assignment
                && scope.includes(state.record.base_id)
                && state.asset_type().is_some_and(|t| asset_type.matches(t))
        });
        for state in assignments {
            if range.contains(state.record.occurred_at.date_naive()) {
                snapshot.assigned += 1;
            }
            if state.effective_status(evaluated_on) == EventStatus::Overdue {
                snapshot.overdue_assignments += 1;
            }
        }

        snapshot.net_movement =
            snapshot.purchases + snapshot.transfers_in - snapshot.transfers_out - snapshot.expended;
        snapshot.closing_balance = snapshot.opening_balance + snapshot.net_movement;
        snapshot
    }

    /// Live stock figures for one pair, including every settled effect.
    #[must_use]
    pub fn position(view: &LedgerView, base_id: BaseId, asset_type: AssetType) -> Position {
        let on_hand: i64 = Self::effects(view, base_id, asset_type)
            .iter()
            .map(BalanceEffect::delta)
            .sum();
        Self::with_reservations(view, base_id, asset_type, on_hand)
    }

    /// Stock figures for one pair as seen by a draw dated `from`.
    ///
    /// `on_hand` is the lowest running count at `from` or after any later
    /// effect, so a draw that fits here leaves every balance dated from
    /// `from` onward non-negative. Without later effects this equals
    /// [`Self::position`].
    #[must_use]
    pub fn position_from(
        view: &LedgerView,
        base_id: BaseId,
        asset_type: AssetType,
        from: DateTime<Utc>,
    ) -> Position {
        let mut effects = Self::effects(view, base_id, asset_type);
        // Within one instant, additions land before draws.
        effects.sort_by_key(|e| (e.at, Reverse(e.delta())));

        let mut running: i64 = effects
            .iter()
            .filter(|e| e.at <= from)
            .map(BalanceEffect::delta)
            .sum();
        let mut lowest = running;
        for effect in effects.iter().filter(|e| e.at > from) {
            running += effect.delta();
            lowest = lowest.min(running);
        }
        Self::with_reservations(view, base_id, asset_type, lowest)
    }

    fn effects(view: &LedgerView, base_id: BaseId, asset_type: AssetType) -> Vec<BalanceEffect> {
        BalanceEffect::collect(view)
            .into_iter()
            .filter(|e| e.base_id == base_id && e.asset_type == asset_type)
            .collect()
    }

    fn with_reservations(
        view: &LedgerView,
        base_id: BaseId,
        asset_type: AssetType,
        on_hand: i64,
    ) -> Position {
        let outstanding_outbound: i64 = view
            .movements()
            .filter(|state| {
                state.is_outstanding_transfer()
                    && state.record.base_id == base_id
                    && state.asset_type() == Some(asset_type)
            })
            .map(|state| i64::from(state.quantity()))
            .sum();

        Position {
            on_hand,
            outstanding_outbound,
            available: on_hand - outstanding_outbound,
        }
    }
}
