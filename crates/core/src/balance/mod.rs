//! Balance projection: on-hand stock derived from the ledger.
//!
//! Nothing here is stored. Every figure is recomputed from a
//! [`LedgerView`](crate::ledger::LedgerView) taken at a fixed cursor, so
//! displayed totals can never drift from the event history.

pub mod effect;
pub mod projector;
pub mod types;

#[cfg(test)]
mod projector_props;

pub use effect::{BalanceEffect, EffectCause};
pub use projector::BalanceProjector;
pub use types::{AssetTypeFilter, BalanceSnapshot, BaseScope, DateRange, Position};
