//! The approval gateway: owner-scoped decision operations.

use std::fmt;
use std::sync::Arc;

use adgate_core::{OwnerId, Proposal, ProposalId, ProposalStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApprovalError, ApprovalResult};
use crate::store::{Decision, ProposalStore};

/// Result of one execution attempt against the external platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the platform accepted the change.
    pub success: bool,
    /// Human-readable confirmation, or the platform's error text verbatim.
    pub message: String,
}

impl ExecutionOutcome {
    /// A successful outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Applies an approved proposal to the external platform.
///
/// Implementations make exactly one platform call per invocation and never
/// mutate proposal state; failures come back as a failed
/// [`ExecutionOutcome`] rather than an error, since "approved but execution
/// failed" is an expected terminal result.
#[async_trait]
pub trait ProposalExecutor: Send + Sync {
    /// Execute the proposal's action.
    async fn execute(&self, proposal: &Proposal) -> ExecutionOutcome;
}

/// Receipt returned by [`ApprovalGateway::approve`].
#[derive(Debug, Clone)]
pub struct ApproveReceipt {
    /// The proposal after the approve-and-run composition.
    pub proposal: Proposal,
    /// Short status line for the caller's UI.
    pub message: String,
    /// The execution outcome text.
    pub outcome: String,
}

/// Receipt returned by [`ApprovalGateway::reject`].
#[derive(Debug, Clone)]
pub struct RejectReceipt {
    /// The rejected proposal.
    pub proposal: Proposal,
    /// Short status line for the caller's UI.
    pub message: String,
}

/// Per-id status in a bulk-approve result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkRowStatus {
    /// Approved and applied to the platform.
    Executed,
    /// Approved, but the platform call failed.
    Failed,
    /// Unknown or foreign id.
    NotFound,
    /// The proposal was no longer pending.
    InvalidState,
}

impl fmt::Display for BulkRowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Executed => "executed",
            Self::Failed => "failed",
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
        };
        f.write_str(s)
    }
}

/// One row of a bulk-approve result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkApproveRow {
    /// The id this row describes.
    pub id: ProposalId,
    /// What happened to it.
    pub status: BulkRowStatus,
    /// Outcome or error text.
    pub message: String,
}

/// The operations a presentation layer uses to decide proposals.
///
/// `approve` composes `decide(Approve)` → `execute` → `record_outcome`.
/// The composition is not transactional: a failure after the external call
/// but before `record_outcome` leaves the proposal `Approved` with no
/// outcome, which is logged and left for operator reconciliation rather
/// than retried (a blind retry risks double execution).
pub struct ApprovalGateway {
    store: Arc<dyn ProposalStore>,
    executor: Arc<dyn ProposalExecutor>,
}

impl ApprovalGateway {
    /// Create a gateway over a ledger and an executor.
    pub fn new(store: Arc<dyn ProposalStore>, executor: Arc<dyn ProposalExecutor>) -> Self {
        Self { store, executor }
    }

    /// List the owner's proposals, newest first, optionally filtered by
    /// status. The limit is clamped by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger fails.
    pub async fn list(
        &self,
        owner: &OwnerId,
        status: Option<ProposalStatus>,
        limit: usize,
    ) -> ApprovalResult<Vec<Proposal>> {
        self.store.list(owner, status, limit).await
    }

    /// Fetch one proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing or foreign id.
    pub async fn get(&self, id: &ProposalId, owner: &OwnerId) -> ApprovalResult<Proposal> {
        self.store.get(id, owner).await
    }

    /// Count the owner's pending proposals.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger fails.
    pub async fn pending_count(&self, owner: &OwnerId) -> ApprovalResult<usize> {
        self.store.pending_count(owner).await
    }

    /// Approve a pending proposal and run it.
    ///
    /// A failed platform call is a successful gateway operation: the
    /// proposal ends `Failed` and the receipt carries the platform's error
    /// text.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing or foreign id, or
    /// [`ApprovalError::InvalidState`] when the proposal is not pending.
    pub async fn approve(&self, id: &ProposalId, owner: &OwnerId) -> ApprovalResult<ApproveReceipt> {
        let approved = self
            .store
            .decide(id, owner, Decision::Approve, None)
            .await?;

        info!(id = %id, kind = ?approved.action_kind(), "Proposal approved, executing");
        let outcome = self.executor.execute(&approved).await;

        let proposal = match self
            .store
            .record_outcome(id, outcome.success, &outcome.message)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                // The external call already happened; the ledger now
                // disagrees with the platform. Surface it loudly and leave
                // the proposal Approved for operator reconciliation.
                warn!(id = %id, error = %e, "Outcome recording failed after platform call");
                approved
            }
        };

        let message = if outcome.success {
            "Proposal approved and executed".to_string()
        } else {
            "Proposal approved but execution failed".to_string()
        };

        Ok(ApproveReceipt {
            proposal,
            message,
            outcome: outcome.message,
        })
    }

    /// Reject a pending proposal, optionally recording the reviewer's note
    /// as its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing or foreign id, or
    /// [`ApprovalError::InvalidState`] when the proposal is not pending.
    pub async fn reject(
        &self,
        id: &ProposalId,
        owner: &OwnerId,
        note: Option<&str>,
    ) -> ApprovalResult<RejectReceipt> {
        let proposal = self.store.decide(id, owner, Decision::Reject, note).await?;
        info!(id = %id, "Proposal rejected");

        Ok(RejectReceipt {
            proposal,
            message: "Proposal rejected".to_string(),
        })
    }

    /// Approve-and-run each id in turn, continuing past individual
    /// failures. Returns one row per input id, in input order.
    pub async fn bulk_approve(&self, ids: &[ProposalId], owner: &OwnerId) -> Vec<BulkApproveRow> {
        let mut rows = Vec::with_capacity(ids.len());

        for id in ids {
            let row = match self.approve(id, owner).await {
                Ok(receipt) => {
                    let status = if receipt.proposal.status == ProposalStatus::Executed {
                        BulkRowStatus::Executed
                    } else {
                        BulkRowStatus::Failed
                    };
                    BulkApproveRow {
                        id: id.clone(),
                        status,
                        message: receipt.outcome,
                    }
                }
                Err(e @ ApprovalError::NotFound { .. }) => BulkApproveRow {
                    id: id.clone(),
                    status: BulkRowStatus::NotFound,
                    message: e.to_string(),
                },
                Err(e @ ApprovalError::InvalidState { .. }) => BulkApproveRow {
                    id: id.clone(),
                    status: BulkRowStatus::InvalidState,
                    message: e.to_string(),
                },
                Err(e) => BulkApproveRow {
                    id: id.clone(),
                    status: BulkRowStatus::Failed,
                    message: e.to_string(),
                },
            };
            rows.push(row);
        }

        rows
    }
}

impl fmt::Debug for ApprovalGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApprovalGateway").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProposalStore;
    use adgate_core::{ActionContext, ActionParams};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Executor that fails for listed campaign ids and records every call.
    struct ScriptedExecutor {
        failing_campaigns: HashSet<String>,
        calls: Mutex<Vec<ProposalId>>,
    }

    impl ScriptedExecutor {
        fn new() -> Self {
            Self {
                failing_campaigns: HashSet::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_for(campaign_id: &str) -> Self {
            let mut executor = Self::new();
            executor.failing_campaigns.insert(campaign_id.to_string());
            executor
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProposalExecutor for ScriptedExecutor {
        async fn execute(&self, proposal: &Proposal) -> ExecutionOutcome {
            self.calls.lock().unwrap().push(proposal.id.clone());
            let campaign = proposal.params.campaign_id();
            if self.failing_campaigns.contains(campaign) {
                ExecutionOutcome::failure(format!("(#100) Invalid parameter for {campaign}"))
            } else {
                ExecutionOutcome::success(format!("Applied {}", proposal.params))
            }
        }
    }

    fn budget_proposal(owner: &OwnerId, campaign_id: &str, new_budget: f64) -> Proposal {
        Proposal::new(
            ActionParams::AdjustBudget {
                campaign_id: campaign_id.to_string(),
                new_budget,
                current_budget: Some(100.0),
            },
            ActionContext {
                campaign_id: Some(campaign_id.to_string()),
                campaign_name: Some("Spring Sale".to_string()),
                account_id: Some("act_1".to_string()),
                adset_id: None,
            },
            "ROAS supports a higher budget",
            owner.clone(),
        )
    }

    fn gateway_with(
        executor: ScriptedExecutor,
    ) -> (ApprovalGateway, Arc<MemoryProposalStore>, Arc<ScriptedExecutor>) {
        let store = Arc::new(MemoryProposalStore::new());
        let executor = Arc::new(executor);
        let gateway = ApprovalGateway::new(
            Arc::clone(&store) as Arc<dyn ProposalStore>,
            Arc::clone(&executor) as Arc<dyn ProposalExecutor>,
        );
        (gateway, store, executor)
    }

    #[tokio::test]
    async fn test_approve_executes_and_records() {
        let (gateway, store, executor) = gateway_with(ScriptedExecutor::new());
        let owner = OwnerId::new();
        let stored = store
            .create(budget_proposal(&owner, "c1", 150.0))
            .await
            .unwrap();

        let receipt = gateway.approve(&stored.id, &owner).await.unwrap();

        assert_eq!(receipt.proposal.status, ProposalStatus::Executed);
        assert!(receipt.outcome.contains("150.00"));
        assert!(receipt.outcome.contains("c1"));
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_approve_failure_is_partial_success() {
        let (gateway, store, executor) = gateway_with(ScriptedExecutor::failing_for("c1"));
        let owner = OwnerId::new();
        let stored = store
            .create(budget_proposal(&owner, "c1", 150.0))
            .await
            .unwrap();

        let receipt = gateway.approve(&stored.id, &owner).await.unwrap();

        assert_eq!(receipt.proposal.status, ProposalStatus::Failed);
        assert!(receipt.outcome.contains("Invalid parameter"));
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_proposal_never_reaches_executor() {
        let (gateway, store, executor) = gateway_with(ScriptedExecutor::new());
        let owner = OwnerId::new();
        let stored = store
            .create(budget_proposal(&owner, "c1", 150.0))
            .await
            .unwrap();

        let receipt = gateway
            .reject(&stored.id, &owner, Some("keep running"))
            .await
            .unwrap();
        assert_eq!(receipt.proposal.status, ProposalStatus::Rejected);
        assert_eq!(receipt.proposal.outcome.as_deref(), Some("keep running"));

        let err = gateway.approve(&stored.id, &owner).await.unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidState { .. }));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bulk_approve_continues_past_failures() {
        let (gateway, store, _executor) = gateway_with(ScriptedExecutor::failing_for("c4"));
        let owner = OwnerId::new();
        let ok = store
            .create(budget_proposal(&owner, "c3", 80.0))
            .await
            .unwrap();
        let bad = store
            .create(budget_proposal(&owner, "c4", 90.0))
            .await
            .unwrap();
        let missing = ProposalId::new();

        let rows = gateway
            .bulk_approve(&[ok.id.clone(), bad.id.clone(), missing.clone()], &owner)
            .await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].status, BulkRowStatus::Executed);
        assert_eq!(rows[1].status, BulkRowStatus::Failed);
        assert_eq!(rows[2].status, BulkRowStatus::NotFound);

        // Each id was updated independently.
        assert_eq!(
            store.get(&ok.id, &owner).await.unwrap().status,
            ProposalStatus::Executed
        );
        assert_eq!(
            store.get(&bad.id, &owner).await.unwrap().status,
            ProposalStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_cross_owner_approve_is_not_found() {
        let (gateway, store, executor) = gateway_with(ScriptedExecutor::new());
        let owner = OwnerId::new();
        let stored = store
            .create(budget_proposal(&owner, "c1", 150.0))
            .await
            .unwrap();

        let intruder = OwnerId::new();
        let err = gateway.approve(&stored.id, &intruder).await.unwrap_err();
        assert!(matches!(err, ApprovalError::NotFound { .. }));
        assert_eq!(executor.call_count(), 0);
    }
}
