//! Property-based tests for the authorization gate.
//!
//! - Admins may perform every action against every target.
//! - Scoped roles never act on targets that do not involve their home base.
//! - Registry edits are admin-only.

use armory_shared::types::{ActorId, BaseId};
use proptest::prelude::*;

use super::{Action, Actor, AuthorizationGate, Role, Target};

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Purchase),
        Just(Action::Transfer),
        Just(Action::Assignment),
        Just(Action::Expenditure),
        Just(Action::RegistryEdit),
    ]
}

fn scoped_role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::BaseCommander), Just(Role::LogisticsOfficer)]
}

/// Picks target bases out of a small pool so that collisions with the home base happen.
fn target_strategy(pool: [BaseId; 3]) -> impl Strategy<Value = Target> {
    prop_oneof![
        (0usize..3).prop_map(move |i| Target::base(pool[i])),
        (0usize..3, 0usize..3)
            .prop_filter("distinct sides", |(a, b)| a != b)
            .prop_map(move |(a, b)| Target::transfer(pool[a], pool[b])),
    ]
}

fn pool() -> [BaseId; 3] {
    [
        BaseId::from_u128(1),
        BaseId::from_u128(2),
        BaseId::from_u128(3),
    ]
}

proptest! {
    #[test]
    fn prop_admin_always_allowed(action in action_strategy(), target in target_strategy(pool())) {
        let admin = Actor::admin(ActorId::new());
        prop_assert!(AuthorizationGate::can_mutate(&admin, action, &target));
    }

    #[test]
    fn prop_scoped_roles_stay_home(
        role in scoped_role_strategy(),
        home in 0usize..3,
        action in action_strategy(),
        target in target_strategy(pool()),
    ) {
        let home = pool()[home];
        let actor = Actor { id: ActorId::new(), role, base_id: Some(home) };
        if AuthorizationGate::can_mutate(&actor, action, &target) {
            prop_assert!(target.involves(home));
            prop_assert_ne!(action, Action::RegistryEdit);
        }
    }

    #[test]
    fn prop_authorize_agrees_with_can_mutate(
        role in scoped_role_strategy(),
        home in 0usize..3,
        action in action_strategy(),
        target in target_strategy(pool()),
    ) {
        let actor = Actor { id: ActorId::new(), role, base_id: Some(pool()[home]) };
        let allowed = AuthorizationGate::can_mutate(&actor, action, &target);
        prop_assert_eq!(AuthorizationGate::authorize(&actor, action, target).is_ok(), allowed);
    }
}
