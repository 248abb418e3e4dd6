//! Asset domain types.

use std::fmt;
use std::str::FromStr;

use armory_shared::types::{AssetId, BaseId, Money};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;
use crate::ledger::EventId;

/// Category of materiel; also the unit of balance aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Trucks, tactical vehicles.
    Vehicle,
    /// Small arms and crew-served weapons.
    Weapon,
    /// Rounds, counted per unit.
    Ammunition,
    /// Everything else (radios, optics, kit).
    Equipment,
}

impl AssetType {
    /// All asset types, in display order.
    pub const ALL: [Self; 4] = [
        Self::Vehicle,
        Self::Weapon,
        Self::Ammunition,
        Self::Equipment,
    ];

    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Weapon => "weapon",
            Self::Ammunition => "ammunition",
            Self::Equipment => "equipment",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("asset type", s))
    }
}

/// Physical condition of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetCondition {
    /// New or as-new.
    Excellent,
    /// Serviceable.
    #[default]
    Good,
    /// Serviceable with wear.
    Fair,
    /// Needs maintenance.
    Poor,
}

impl AssetCondition {
    /// Returns the string representation of the condition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for AssetCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCondition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(UnknownVariant::new("asset condition", s)),
        }
    }
}

/// Lifecycle status of an individual asset.
///
/// Valid transitions:
/// - Available → Assigned, Maintenance, Retired
/// - Assigned → Available, Maintenance
/// - Maintenance → Available, Retired
/// - Retired is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    /// In stock at its base.
    Available,
    /// In the custody of a person through an open assignment.
    Assigned,
    /// Out of service for repair.
    Maintenance,
    /// Permanently withdrawn.
    Retired,
}

impl AssetStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }

    /// Statuses reachable from this one in a single step.
    #[must_use]
    pub const fn allowed_next(&self) -> &'static [Self] {
        match self {
            Self::Available => &[Self::Assigned, Self::Maintenance, Self::Retired],
            Self::Assigned => &[Self::Available, Self::Maintenance],
            Self::Maintenance => &[Self::Available, Self::Retired],
            Self::Retired => &[],
        }
    }

    /// Returns true if `next` is reachable from this status in a single step.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Retired)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(UnknownVariant::new("asset status", s)),
        }
    }
}

/// An individually tracked asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier.
    pub id: AssetId,
    /// Display name (e.g. "M4A1 Rifle").
    pub name: String,
    /// Asset category.
    pub asset_type: AssetType,
    /// Manufacturer serial number, if any.
    pub serial_number: Option<String>,
    /// Physical condition.
    pub condition: AssetCondition,
    /// Lifecycle status.
    pub status: AssetStatus,
    /// Owning base.
    pub base_id: BaseId,
    /// Book value.
    pub value: Money,
    /// Date the asset entered inventory.
    pub acquired_on: Option<NaiveDate>,
}

/// One accepted status change in an asset's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransition {
    /// Previous status; `None` for enrolment.
    pub from: Option<AssetStatus>,
    /// New status.
    pub to: AssetStatus,
    /// Ledger record that caused the change.
    pub causing_event: EventId,
    /// When the causing record occurred.
    pub at: DateTime<Utc>,
}

/// Stored form of an asset: current state plus its transition trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Current state.
    pub asset: Asset,
    /// Every accepted transition, oldest first.
    pub history: Vec<AssetTransition>,
}
