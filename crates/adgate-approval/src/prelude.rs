//! Commonly used approval types.

pub use crate::error::{ApprovalError, ApprovalResult};
pub use crate::gateway::{
    ApprovalGateway, ApproveReceipt, BulkApproveRow, BulkRowStatus, ExecutionOutcome,
    ProposalExecutor, RejectReceipt,
};
pub use crate::store::{Decision, MemoryProposalStore, ProposalStore, MAX_PAGE_SIZE};
