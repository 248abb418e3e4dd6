//! Core asset ledger logic for Armory.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every change to stock or custody is an immutable ledger record; balances,
//! statuses and dashboard figures are derived from the record log.
//!
//! # Modules
//!
//! - `asset` - Registry of individually tracked assets
//! - `auth` - Roles and the authorization gate
//! - `balance` - Balance projection over a ledger version
//! - `base` - Bases holding inventory
//! - `clock` - Injectable time source
//! - `ledger` - Ledger records, workflows and the ledger engine
//! - `store` - Storage traits and in-memory backends

pub mod asset;
pub mod auth;
pub mod balance;
pub mod base;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod store;

pub use ledger::{LedgerEngine, LedgerError};
