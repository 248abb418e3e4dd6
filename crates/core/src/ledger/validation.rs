//! Input validation for ledger requests.
//!
//! These checks need nothing but the request itself and run before any
//! lookup, authorization or balance check. One predicate per request kind,
//! dispatched by [`validate_request`].

use armory_shared::types::Money;
use chrono::NaiveDate;

use super::error::LedgerError;
use super::request::{
    AssetStatusRequest, AssignmentRequest, EnrolAssetRequest, EventRequest, ExpenditureRequest,
    PurchaseRequest, TransferRequest,
};
use crate::asset::AssetStatus;

/// Validates any request, given the calendar date it is recorded for.
///
/// # Errors
///
/// Returns a validation-kind [`LedgerError`] describing the first problem found.
pub fn validate_request(request: &EventRequest, occurred_on: NaiveDate) -> Result<(), LedgerError> {
    match request {
        EventRequest::Purchase(r) => validate_purchase(r),
        EventRequest::Transfer(r) => validate_transfer(r),
        EventRequest::Assignment(r) => validate_assignment(r, occurred_on),
        EventRequest::Expenditure(r) => validate_expenditure(r),
        EventRequest::EnrolAsset(r) => validate_enrolment(r),
        EventRequest::ChangeAssetStatus(r) => validate_asset_status_change(r),
    }
}

/// Purchase: positive quantity, non-negative unit price, named item and vendor.
pub fn validate_purchase(request: &PurchaseRequest) -> Result<(), LedgerError> {
    require_quantity(request.quantity)?;
    require_non_negative(&request.unit_price, "unit_price")?;
    require_text(&request.asset_name, "asset_name")?;
    require_text(&request.vendor, "vendor")
}

/// Transfer: positive quantity between two distinct bases.
pub fn validate_transfer(request: &TransferRequest) -> Result<(), LedgerError> {
    require_quantity(request.quantity)?;
    require_text(&request.asset_name, "asset_name")?;
    if request.from_base == request.to_base {
        return Err(LedgerError::SameBaseTransfer(request.from_base));
    }
    Ok(())
}

/// Assignment: named custodian and purpose, return date not before the assignment.
pub fn validate_assignment(
    request: &AssignmentRequest,
    occurred_on: NaiveDate,
) -> Result<(), LedgerError> {
    require_text(&request.assigned_to, "assigned_to")?;
    require_text(&request.purpose, "purpose")?;
    if let Some(expected) = request.expected_return_date
        && expected < occurred_on
    {
        return Err(LedgerError::ReturnBeforeAssignment {
            expected,
            assigned: occurred_on,
        });
    }
    Ok(())
}

/// Expenditure: positive quantity, non-negative cost, stated reason.
pub fn validate_expenditure(request: &ExpenditureRequest) -> Result<(), LedgerError> {
    require_quantity(request.quantity)?;
    require_non_negative(&request.cost, "cost")?;
    require_text(&request.asset_name, "asset_name")?;
    require_text(&request.reason, "reason")
}

/// Enrolment: named asset with a non-negative value.
pub fn validate_enrolment(request: &EnrolAssetRequest) -> Result<(), LedgerError> {
    require_text(&request.name, "name")?;
    require_non_negative(&request.value, "value")
}

/// Manual status change: `assigned` is reserved for assignments.
pub fn validate_asset_status_change(request: &AssetStatusRequest) -> Result<(), LedgerError> {
    if request.to == AssetStatus::Assigned {
        return Err(LedgerError::AssignmentRequired);
    }
    Ok(())
}

fn require_quantity(quantity: u32) -> Result<(), LedgerError> {
    if quantity == 0 {
        return Err(LedgerError::ZeroQuantity);
    }
    Ok(())
}

fn require_non_negative(amount: &Money, field: &'static str) -> Result<(), LedgerError> {
    if amount.is_negative() {
        return Err(LedgerError::NegativeAmount { field });
    }
    Ok(())
}

fn require_text(value: &str, field: &'static str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    Ok(())
}
