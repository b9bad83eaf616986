//! Error types for the approval ledger and gateway.

use adgate_core::{ProposalId, ProposalStatus};
use thiserror::Error;

/// Errors from ledger and gateway operations.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// The proposal does not exist, or belongs to a different owner.
    ///
    /// Cross-owner access is reported identically to a missing id so that
    /// the gateway never leaks which ids exist.
    #[error("Proposal not found: {id}")]
    NotFound {
        /// The id that was requested.
        id: ProposalId,
    },

    /// The proposal is not in the state the operation requires.
    ///
    /// Decisions require `Pending`; outcome recording requires `Approved`.
    /// This is the error that loses a double-decision race.
    #[error("Proposal {id} is already {current}")]
    InvalidState {
        /// The id that was operated on.
        id: ProposalId,
        /// The status the proposal actually has.
        current: ProposalStatus,
    },

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
