//! The proposal record: the approval ledger's unit of record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::{ActionContext, ActionKind, ActionParams};
use crate::types::{OwnerId, ProposalId, Timestamp};

/// Lifecycle status of a proposal.
///
/// Transitions only move forward:
///
/// ```text
/// Pending --approve--> Approved --execute ok--> Executed
/// Pending --approve--> Approved --execute err--> Failed
/// Pending --reject--> Rejected
/// ```
///
/// `Rejected`, `Executed`, and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Awaiting a human decision.
    Pending,
    /// Approved; execution attempt in flight or pending outcome.
    Approved,
    /// Declined by the owner. Terminal.
    Rejected,
    /// Approved and applied to the platform. Terminal.
    Executed,
    /// Approved but the platform call failed. Terminal.
    Failed,
}

impl ProposalStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Executed | Self::Failed)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Executed => "executed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A durable record of a suggested platform action.
///
/// Created by the orchestrator when the model emits a valid tool call;
/// decided by the owner through the gateway; given its terminal outcome by
/// the executor's result. Never deleted — proposals are the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique identifier, assigned at creation.
    pub id: ProposalId,
    /// Validated, kind-specific execution parameters. Immutable.
    pub params: ActionParams,
    /// Human-readable identifiers for audit/UI. Not authoritative.
    pub context: ActionContext,
    /// The agent's justification. Mandatory, non-empty.
    pub rationale: String,
    /// Current lifecycle status.
    pub status: ProposalStatus,
    /// The principal who may decide this proposal.
    pub owner: OwnerId,
    /// When the proposal was created.
    pub created_at: Timestamp,
    /// When it was approved or rejected. Set exactly once.
    pub decided_at: Option<Timestamp>,
    /// When execution finished. Set exactly once.
    pub executed_at: Option<Timestamp>,
    /// Terminal result or error text. Set on entry to Executed/Failed, and
    /// optionally on Rejected to record the reviewer's note.
    pub outcome: Option<String>,
}

impl Proposal {
    /// Create a new pending proposal.
    #[must_use]
    pub fn new(
        params: ActionParams,
        context: ActionContext,
        rationale: impl Into<String>,
        owner: OwnerId,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            params,
            context,
            rationale: rationale.into(),
            status: ProposalStatus::Pending,
            owner,
            created_at: Timestamp::now(),
            decided_at: None,
            executed_at: None,
            outcome: None,
        }
    }

    /// The action kind of this proposal.
    #[must_use]
    pub fn action_kind(&self) -> ActionKind {
        self.params.kind()
    }

    /// Short human summary for acknowledgment messages and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.context.campaign_name.as_deref() {
            Some(name) => format!("{} ('{}')", self.params, name),
            None => self.params.to_string(),
        }
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.status, self.params)
    }
}
