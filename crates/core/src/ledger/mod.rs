//! The append-only asset ledger.
//!
//! This module implements the core ledger functionality:
//! - Ledger records and their kind-specific payloads
//! - Mutation requests and their input validation
//! - Status workflows for purchases, transfers and assignments
//! - Replay of a ledger prefix into movement states
//! - Per (base, asset type) mutation queues
//! - The ledger engine, the single writer of records
//! - Error types for ledger operations

pub mod engine;
pub mod error;
pub mod event;
pub mod locks;
pub mod query;
pub mod replay;
pub mod request;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod engine_props;
#[cfg(test)]
mod validation_props;

pub use engine::{LedgerEngine, LedgerEngineBuilder};
pub use error::{LedgerError, RejectionKind};
pub use event::{
    AssetEnrolmentDetails, AssetStatusChangeDetails, AssignmentDetails, EventPayload,
    ExpenditureDetails, LedgerRecord, PurchaseDetails, RecordDraft, StatusChangeDetails,
    TransferDetails,
};
pub use locks::{LockKey, LockSet, LockTable, RegistryLock};
pub use query::{EventFilter, EventView};
pub use replay::{LedgerView, MovementState, StatusStep};
pub use request::{
    AssetStatusRequest, AssignmentRequest, EnrolAssetRequest, EventRequest, ExpenditureRequest,
    PurchaseRequest, StatusChangeRequest, TransferRequest,
};
pub use types::{EventId, EventKind, EventStatus, LedgerCursor};
pub use validation::validate_request;
pub use workflow::StatusWorkflow;
