//! Actors, roles and the capability check applied before every ledger mutation.
//!
//! The acting user is always passed explicitly; there is no ambient
//! "current user".

mod gate;

#[cfg(test)]
mod gate_props;

pub use gate::AuthorizationGate;

use std::fmt;
use std::str::FromStr;

use armory_shared::types::{ActorId, BaseId};
use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Dashboard roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access at every base, including asset registry edits.
    Admin,
    /// Purchases, transfers and assignments at their own base.
    BaseCommander,
    /// Purchases and outbound transfers at their own base.
    LogisticsOfficer,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::BaseCommander => "base_commander",
            Self::LogisticsOfficer => "logistics_officer",
        }
    }

    /// Returns true if the role is limited to a home base.
    #[must_use]
    pub const fn is_base_scoped(&self) -> bool {
        !matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "base_commander" => Ok(Self::BaseCommander),
            "logistics_officer" => Ok(Self::LogisticsOfficer),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

/// An authenticated user, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier.
    pub id: ActorId,
    /// Role granting capabilities.
    pub role: Role,
    /// Home base; `None` for admins.
    pub base_id: Option<BaseId>,
}

impl Actor {
    /// Creates an admin actor.
    #[must_use]
    pub fn admin(id: ActorId) -> Self {
        Self {
            id,
            role: Role::Admin,
            base_id: None,
        }
    }

    /// Creates a base commander for `base_id`.
    #[must_use]
    pub fn base_commander(id: ActorId, base_id: BaseId) -> Self {
        Self {
            id,
            role: Role::BaseCommander,
            base_id: Some(base_id),
        }
    }

    /// Creates a logistics officer for `base_id`.
    #[must_use]
    pub fn logistics_officer(id: ActorId, base_id: BaseId) -> Self {
        Self {
            id,
            role: Role::LogisticsOfficer,
            base_id: Some(base_id),
        }
    }
}

/// Mutation categories gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create or progress a purchase.
    Purchase,
    /// Create or progress a transfer.
    Transfer,
    /// Create or return an assignment.
    Assignment,
    /// Record an expenditure.
    Expenditure,
    /// Enrol an asset or change its status by hand.
    RegistryEdit,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Transfer => "transfer",
            Self::Assignment => "assignment",
            Self::Expenditure => "expenditure",
            Self::RegistryEdit => "registry_edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bases a mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Target {
    /// A single-base event.
    Base {
        /// The base the event belongs to.
        base_id: BaseId,
    },
    /// A movement between two bases.
    Transfer {
        /// Source base.
        from: BaseId,
        /// Destination base.
        to: BaseId,
    },
}

impl Target {
    /// Targets a single base.
    #[must_use]
    pub const fn base(base_id: BaseId) -> Self {
        Self::Base { base_id }
    }

    /// Targets a transfer between two bases.
    #[must_use]
    pub const fn transfer(from: BaseId, to: BaseId) -> Self {
        Self::Transfer { from, to }
    }

    /// The base whose stock the mutation draws on or belongs to.
    #[must_use]
    pub const fn source(&self) -> BaseId {
        match *self {
            Self::Base { base_id } => base_id,
            Self::Transfer { from, .. } => from,
        }
    }

    /// Returns true if `base_id` is on either side of the target.
    #[must_use]
    pub fn involves(&self, base_id: BaseId) -> bool {
        match *self {
            Self::Base { base_id: own } => own == base_id,
            Self::Transfer { from, to } => from == base_id || to == base_id,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base { base_id } => write!(f, "base {base_id}"),
            Self::Transfer { from, to } => write!(f, "transfer {from} -> {to}"),
        }
    }
}
