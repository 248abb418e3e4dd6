//! Bases: the scope boundary for authorization and balance aggregation.
//!
//! Bases are referenced by id from events and assets, never owned by them.

use std::collections::BTreeMap;

use armory_shared::types::{ActorId, BaseId};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// An installation holding inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    /// Base identifier.
    pub id: BaseId,
    /// Display name (e.g. "Fort Liberty").
    pub name: String,
    /// Geographic location.
    pub location: String,
    /// Short unique code (e.g. "FTLB").
    pub code: String,
    /// Commanding officer, if assigned.
    pub commander_id: Option<ActorId>,
}

impl Base {
    /// Creates a base with a fresh id and no commander.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: BaseId::new(),
            name: name.into(),
            location: location.into(),
            code: code.into(),
            commander_id: None,
        }
    }

    /// Sets the commanding officer.
    #[must_use]
    pub fn with_commander(mut self, commander: ActorId) -> Self {
        self.commander_id = Some(commander);
        self
    }
}

/// Read-only lookup of the known bases.
#[derive(Debug, Clone, Default)]
pub struct BaseDirectory {
    bases: BTreeMap<BaseId, Base>,
}

impl BaseDirectory {
    /// Builds a directory; a later base with the same id replaces an earlier one.
    pub fn new(bases: impl IntoIterator<Item = Base>) -> Self {
        Self {
            bases: bases.into_iter().map(|base| (base.id, base)).collect(),
        }
    }

    /// Looks up a base by id.
    #[must_use]
    pub fn get(&self, id: BaseId) -> Option<&Base> {
        self.bases.get(&id)
    }

    /// Looks up a base by id, failing with `BaseNotFound`.
    pub fn require(&self, id: BaseId) -> Result<&Base, LedgerError> {
        self.get(id).ok_or(LedgerError::BaseNotFound(id))
    }

    /// Looks up a base by its code, ignoring ASCII case.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Base> {
        self.bases
            .values()
            .find(|base| base.code.eq_ignore_ascii_case(code))
    }

    /// Iterates bases in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Base> {
        self.bases.values()
    }

    /// Number of bases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns true if no bases are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}
