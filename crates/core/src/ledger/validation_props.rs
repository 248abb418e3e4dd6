//! Property-based tests for request validation.
//!
//! - Zero quantities are always rejected, whatever the other fields hold.
//! - Well-formed purchases and expenditures are always accepted.

use armory_shared::types::{BaseId, Money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::request::{ExpenditureRequest, PurchaseRequest};
use super::validation::{validate_expenditure, validate_purchase};
use crate::asset::AssetType;

fn asset_type_strategy() -> impl Strategy<Value = AssetType> {
    prop_oneof![
        Just(AssetType::Vehicle),
        Just(AssetType::Weapon),
        Just(AssetType::Ammunition),
        Just(AssetType::Equipment),
    ]
}

/// Non-negative amounts from 0.00 to 1,000,000.00.
fn price_strategy() -> impl Strategy<Value = Money> {
    (0i64..100_000_000i64).prop_map(|cents| Money::usd(Decimal::new(cents, 2)))
}

fn purchase(asset_type: AssetType, quantity: u32, unit_price: Money) -> PurchaseRequest {
    PurchaseRequest {
        base_id: BaseId::from_u128(1),
        asset_name: "Item".to_string(),
        asset_type,
        quantity,
        unit_price,
        vendor: "Vendor".to_string(),
        notes: None,
    }
}

proptest! {
    #[test]
    fn prop_zero_quantity_always_rejected(
        asset_type in asset_type_strategy(),
        unit_price in price_strategy(),
    ) {
        let result = validate_purchase(&purchase(asset_type, 0, unit_price));
        prop_assert!(matches!(result, Err(LedgerError::ZeroQuantity)));
    }

    #[test]
    fn prop_well_formed_purchase_accepted(
        asset_type in asset_type_strategy(),
        quantity in 1u32..=1_000_000,
        unit_price in price_strategy(),
    ) {
        prop_assert!(validate_purchase(&purchase(asset_type, quantity, unit_price)).is_ok());
    }

    #[test]
    fn prop_expenditure_quantity_and_cost(
        asset_type in asset_type_strategy(),
        quantity in 0u32..=1_000,
        cents in -1_000i64..1_000,
    ) {
        let request = ExpenditureRequest {
            base_id: BaseId::from_u128(1),
            asset_name: "Item".to_string(),
            asset_type,
            quantity,
            reason: "Training".to_string(),
            cost: Money::usd(Decimal::new(cents, 2)),
            notes: None,
        };
        let result = validate_expenditure(&request);
        if quantity == 0 {
            prop_assert!(matches!(result, Err(LedgerError::ZeroQuantity)));
        } else if cents < 0 {
            let negative = matches!(result, Err(LedgerError::NegativeAmount { field: "cost" }));
            prop_assert!(negative);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
