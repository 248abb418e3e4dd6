//! Projection inputs and outputs.

use std::fmt;

use armory_shared::types::BaseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::asset::AssetType;
use crate::ledger::{LedgerCursor, LedgerError};

/// Which bases a projection aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseScope {
    /// Every base.
    All,
    /// A single base.
    Base(BaseId),
}

impl BaseScope {
    /// Returns true if `base_id` is aggregated.
    #[must_use]
    pub fn includes(&self, base_id: BaseId) -> bool {
        match self {
            Self::All => true,
            Self::Base(own) => *own == base_id,
        }
    }
}

impl fmt::Display for BaseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Base(id) => write!(f, "{id}"),
        }
    }
}

/// Which asset types a projection aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetTypeFilter {
    /// Every type.
    #[default]
    All,
    /// A single type.
    Only(AssetType),
}

impl AssetTypeFilter {
    /// Returns true if `asset_type` is aggregated.
    #[must_use]
    pub fn matches(&self, asset_type: AssetType) -> bool {
        match self {
            Self::All => true,
            Self::Only(own) => *own == asset_type,
        }
    }
}

impl From<Option<AssetType>> for AssetTypeFilter {
    fn from(value: Option<AssetType>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl fmt::Display for AssetTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(t) => write!(f, "{t}"),
        }
    }
}

/// Calendar date range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start` after `end` is rejected.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day included.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day included.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Live stock figures for one (base, asset type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Position {
    /// Units physically counted at the base.
    pub on_hand: i64,
    /// Units promised to pending or in-transit outbound transfers.
    pub outstanding_outbound: i64,
    /// `on_hand - outstanding_outbound`; what new draws may consume.
    pub available: i64,
}

/// Derived dashboard figures for a scope, type filter and date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    /// Bases aggregated.
    pub scope: BaseScope,
    /// Asset types aggregated.
    pub asset_type: AssetTypeFilter,
    /// Reporting period.
    pub range: DateRange,
    /// Ledger version the figures were computed from.
    pub cursor: LedgerCursor,
    /// Date used to decide which assignments are overdue.
    pub evaluated_on: NaiveDate,
    /// On-hand units before the range starts.
    pub opening_balance: i64,
    /// On-hand units at the end of the range.
    pub closing_balance: i64,
    /// `closing_balance - opening_balance`.
    pub net_movement: i64,
    /// Units delivered by purchases during the range.
    pub purchases: i64,
    /// Units received by completed transfers during the range.
    pub transfers_in: i64,
    /// Units sent by completed transfers during the range.
    pub transfers_out: i64,
    /// Units expended during the range.
    pub expended: i64,
    /// Assignments opened during the range (custody only, no on-hand effect).
    pub assigned: i64,
    /// Assignments overdue as of `evaluated_on`.
    pub overdue_assignments: i64,
}
