//! Property-based tests for the ledger engine.
//!
//! Properties covered:
//! - Conservation: total on-hand equals delivered minus expended
//! - No base ever reports negative on-hand or available stock
//! - Projection at a fixed cursor is unaffected by later writes

use std::sync::Arc;

use armory_shared::config::LedgerConfig;
use armory_shared::types::{ActorId, BaseId, Money};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use crate::asset::AssetType;
use crate::auth::Actor;
use crate::balance::{AssetTypeFilter, BaseScope, DateRange};
use crate::base::{Base, BaseDirectory};
use crate::clock::FixedClock;
use crate::ledger::{
    EventRequest, EventStatus, ExpenditureRequest, LedgerEngine, PurchaseRequest,
    StatusChangeRequest, TransferRequest,
};

const BASES: [BaseId; 3] = [
    BaseId::from_u128(1),
    BaseId::from_u128(2),
    BaseId::from_u128(3),
];

#[derive(Debug, Clone)]
enum Op {
    Purchase { base: usize, quantity: u32, deliver: bool },
    Transfer { from: usize, to: usize, quantity: u32, outcome: u8 },
    Expend { base: usize, quantity: u32 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u32..50, any::<bool>())
            .prop_map(|(base, quantity, deliver)| Op::Purchase { base, quantity, deliver }),
        (0usize..3, 0usize..3, 1u32..40, 0u8..4).prop_map(|(from, to, quantity, outcome)| {
            Op::Transfer { from, to, quantity, outcome }
        }),
        (0usize..3, 1u32..30).prop_map(|(base, quantity)| Op::Expend { base, quantity }),
    ]
}

fn engine() -> LedgerEngine {
    let bases = BASES.iter().enumerate().map(|(i, id)| {
        let mut base = Base::new(format!("Base {i}"), "Test", format!("B{i}"));
        base.id = *id;
        base
    });
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    LedgerEngine::builder(BaseDirectory::new(bases))
        .clock(Arc::new(FixedClock::new(now)))
        .config(LedgerConfig::default())
        .build()
}

fn advance(engine: &LedgerEngine, admin: &Actor, id: crate::ledger::EventId, steps: &[EventStatus]) {
    for &to in steps {
        engine
            .transition(admin, StatusChangeRequest::new(id, to))
            .unwrap();
    }
}

/// Applies `ops`, returning units delivered and expended by accepted records.
fn apply(engine: &LedgerEngine, ops: &[Op]) -> (i64, i64) {
    let admin = Actor::admin(ActorId::from_u128(1));
    let mut delivered = 0i64;
    let mut expended = 0i64;

    for op in ops {
        match *op {
            Op::Purchase { base, quantity, deliver } => {
                let id = engine
                    .record(
                        &admin,
                        EventRequest::Purchase(PurchaseRequest {
                            base_id: BASES[base],
                            asset_name: "5.56mm Ammunition".to_string(),
                            asset_type: AssetType::Ammunition,
                            quantity,
                            unit_price: Money::usd(dec!(0.45)),
                            vendor: "Federal Premium".to_string(),
                            notes: None,
                        }),
                    )
                    .unwrap();
                if deliver {
                    advance(engine, &admin, id, &[EventStatus::Delivered]);
                    delivered += i64::from(quantity);
                }
            }
            Op::Transfer { from, to, quantity, outcome } => {
                let result = engine.record(
                    &admin,
                    EventRequest::Transfer(TransferRequest {
                        from_base: BASES[from],
                        to_base: BASES[to],
                        asset_name: "5.56mm Ammunition".to_string(),
                        asset_type: AssetType::Ammunition,
                        quantity,
                        estimated_arrival: None,
                        notes: None,
                    }),
                );
                // Same-base and over-drawn transfers are rejected; both are fine here.
                if let Ok(id) = result {
                    let steps: &[EventStatus] = match outcome {
                        0 => &[],
                        1 => &[EventStatus::InTransit],
                        2 => &[EventStatus::InTransit, EventStatus::Completed],
                        _ => &[EventStatus::Rejected],
                    };
                    advance(engine, &admin, id, steps);
                }
            }
            Op::Expend { base, quantity } => {
                let result = engine.record(
                    &admin,
                    EventRequest::Expenditure(ExpenditureRequest {
                        base_id: BASES[base],
                        asset_name: "5.56mm Ammunition".to_string(),
                        asset_type: AssetType::Ammunition,
                        quantity,
                        reason: "Training".to_string(),
                        cost: Money::usd(dec!(0)),
                        notes: None,
                    }),
                );
                if result.is_ok() {
                    expended += i64::from(quantity);
                }
            }
        }
    }

    (delivered, expended)
}

fn march() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_stock_is_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let engine = engine();
        let (delivered, expended) = apply(&engine, &ops);

        let mut total = 0i64;
        for base in BASES {
            let position = engine.position(base, AssetType::Ammunition).unwrap();
            prop_assert!(position.on_hand >= 0, "negative on-hand at {}", base);
            prop_assert!(position.available >= 0, "negative available at {}", base);
            prop_assert!(position.available <= position.on_hand);
            total += position.on_hand;
        }
        prop_assert_eq!(total, delivered - expended);

        let all = engine
            .project(BaseScope::All, AssetTypeFilter::Only(AssetType::Ammunition), march())
            .unwrap();
        prop_assert_eq!(all.closing_balance, total);
    }

    #[test]
    fn prop_projection_pinned_to_cursor(
        before in prop::collection::vec(op_strategy(), 1..20),
        after in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let engine = engine();
        apply(&engine, &before);
        let cursor = engine.cursor().unwrap();
        let first = engine
            .project_at(cursor, BaseScope::All, AssetTypeFilter::All, march())
            .unwrap();

        apply(&engine, &after);
        let second = engine
            .project_at(cursor, BaseScope::All, AssetTypeFilter::All, march())
            .unwrap();
        prop_assert_eq!(first, second);
    }
}
