//! Adgate Approval - The approval ledger and gateway.
//!
//! This crate provides:
//! - [`ProposalStore`]: the ledger trait with a compare-and-swap `decide`
//!   contract, plus the in-memory implementation
//! - [`ApprovalGateway`]: the owner-scoped operations exposed to a
//!   presentation layer (list, inspect, approve, reject, bulk approve)
//! - [`ProposalExecutor`]: the seam through which approved proposals reach
//!   the external platform
//!
//! The gateway composes `decide(Approve)` → `execute` → `record_outcome`;
//! that composition is deliberately not transactional (the external call
//! cannot be made atomic with the ledger write), so `record_outcome` is the
//! only place a terminal outcome enters the record.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

mod error;
mod gateway;
mod store;

pub use error::{ApprovalError, ApprovalResult};
pub use gateway::{
    ApprovalGateway, ApproveReceipt, BulkApproveRow, BulkRowStatus, ExecutionOutcome,
    ProposalExecutor, RejectReceipt,
};
pub use store::{Decision, MemoryProposalStore, ProposalStore, MAX_PAGE_SIZE};
