//! Role capability table.
//!
//! | Role              | Purchase | Transfer              | Assignment/Expenditure | Registry edit |
//! |-------------------|----------|-----------------------|------------------------|---------------|
//! | admin             | any base | any base              | any base               | yes           |
//! | base_commander    | own base | own base, either side | own base               | no            |
//! | logistics_officer | own base | own base as source    | no                     | no            |

use tracing::debug;

use super::{Action, Actor, Role, Target};
use crate::ledger::LedgerError;

/// Stateless capability check.
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Returns true if `actor` may perform `action` against `target`.
    #[must_use]
    pub fn can_mutate(actor: &Actor, action: Action, target: &Target) -> bool {
        let home = match (actor.role, actor.base_id) {
            (Role::Admin, _) => return true,
            (_, Some(home)) => home,
            (_, None) => return false,
        };

        match (actor.role, action) {
            (_, Action::RegistryEdit)
            | (Role::LogisticsOfficer, Action::Assignment | Action::Expenditure) => false,
            (Role::LogisticsOfficer, Action::Transfer) => target.source() == home,
            _ => target.involves(home),
        }
    }

    /// Fails with `Forbidden` unless [`Self::can_mutate`] allows the mutation.
    pub fn authorize(actor: &Actor, action: Action, target: Target) -> Result<(), LedgerError> {
        if Self::can_mutate(actor, action, &target) {
            return Ok(());
        }

        debug!(actor = %actor.id, role = %actor.role, %action, %target, "mutation denied");
        Err(LedgerError::Forbidden {
            actor: actor.id,
            role: actor.role,
            action,
            target,
        })
    }
}
