//! Proposal ledger storage trait and in-memory implementation.

use std::collections::HashMap;
use std::fmt;

use adgate_core::{OwnerId, Proposal, ProposalId, ProposalStatus, Timestamp};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ApprovalError, ApprovalResult};

/// Upper bound on `list` page size, regardless of the requested limit.
pub const MAX_PAGE_SIZE: usize = 200;

/// A human decision on a pending proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Approve the proposal for execution.
    Approve,
    /// Decline the proposal.
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// The approval ledger.
///
/// Implementations must be thread-safe, and `decide` must be atomic with
/// respect to the Pending check: two concurrent decisions on the same
/// proposal must yield exactly one success and one
/// [`ApprovalError::InvalidState`]. Every operation that takes an owner is
/// scoped to it; a foreign owner's id is indistinguishable from a missing
/// one.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Persist a new proposal. Proposals always enter the ledger `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the proposal cannot be persisted.
    async fn create(&self, proposal: Proposal) -> ApprovalResult<Proposal>;

    /// Fetch a proposal by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing or foreign id.
    async fn get(&self, id: &ProposalId, owner: &OwnerId) -> ApprovalResult<Proposal>;

    /// Apply a decision to a pending proposal (check-and-set).
    ///
    /// On `Reject`, the reviewer's note (if any) is recorded verbatim as the
    /// proposal's outcome. `decided_at` is set exactly once, here.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing or foreign id, or
    /// [`ApprovalError::InvalidState`] when the proposal is no longer
    /// `Pending` (decisions are not idempotent).
    async fn decide(
        &self,
        id: &ProposalId,
        owner: &OwnerId,
        decision: Decision,
        note: Option<&str>,
    ) -> ApprovalResult<Proposal>;

    /// Record the terminal result of an execution attempt.
    ///
    /// Only legal while the proposal is `Approved`; moves it to `Executed`
    /// or `Failed` and sets `executed_at` and `outcome` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for a missing id, or
    /// [`ApprovalError::InvalidState`] when the proposal is not `Approved`.
    async fn record_outcome(
        &self,
        id: &ProposalId,
        success: bool,
        message: &str,
    ) -> ApprovalResult<Proposal>;

    /// List an owner's proposals, newest first.
    ///
    /// `limit` is clamped to [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn list(
        &self,
        owner: &OwnerId,
        status: Option<ProposalStatus>,
        limit: usize,
    ) -> ApprovalResult<Vec<Proposal>>;

    /// Count an owner's pending proposals.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn pending_count(&self, owner: &OwnerId) -> ApprovalResult<usize>;
}

/// In-memory ledger.
///
/// The mutex is held across the status check and write in `decide` and
/// `record_outcome`, which is what gives those operations their
/// check-and-set guarantee.
#[derive(Default)]
pub struct MemoryProposalStore {
    proposals: Mutex<HashMap<ProposalId, Proposal>>,
}

impl MemoryProposalStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryProposalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryProposalStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProposalStore for MemoryProposalStore {
    async fn create(&self, proposal: Proposal) -> ApprovalResult<Proposal> {
        debug!(id = %proposal.id, kind = ?proposal.action_kind(), "Storing proposal");
        let mut proposals = self.proposals.lock().await;
        proposals.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    async fn get(&self, id: &ProposalId, owner: &OwnerId) -> ApprovalResult<Proposal> {
        let proposals = self.proposals.lock().await;
        proposals
            .get(id)
            .filter(|p| &p.owner == owner)
            .cloned()
            .ok_or_else(|| ApprovalError::NotFound { id: id.clone() })
    }

    async fn decide(
        &self,
        id: &ProposalId,
        owner: &OwnerId,
        decision: Decision,
        note: Option<&str>,
    ) -> ApprovalResult<Proposal> {
        let mut proposals = self.proposals.lock().await;

        let proposal = proposals
            .get_mut(id)
            .filter(|p| &p.owner == owner)
            .ok_or_else(|| ApprovalError::NotFound { id: id.clone() })?;

        if proposal.status != ProposalStatus::Pending {
            return Err(ApprovalError::InvalidState {
                id: id.clone(),
                current: proposal.status,
            });
        }

        proposal.status = match decision {
            Decision::Approve => ProposalStatus::Approved,
            Decision::Reject => ProposalStatus::Rejected,
        };
        proposal.decided_at = Some(Timestamp::now());
        if decision == Decision::Reject {
            proposal.outcome = note.map(ToString::to_string);
        }

        debug!(id = %id, decision = %decision, "Proposal decided");
        Ok(proposal.clone())
    }

    async fn record_outcome(
        &self,
        id: &ProposalId,
        success: bool,
        message: &str,
    ) -> ApprovalResult<Proposal> {
        let mut proposals = self.proposals.lock().await;

        let proposal = proposals
            .get_mut(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.clone() })?;

        if proposal.status != ProposalStatus::Approved {
            return Err(ApprovalError::InvalidState {
                id: id.clone(),
                current: proposal.status,
            });
        }

        proposal.status = if success {
            ProposalStatus::Executed
        } else {
            ProposalStatus::Failed
        };
        proposal.executed_at = Some(Timestamp::now());
        proposal.outcome = Some(message.to_string());

        debug!(id = %id, success, "Outcome recorded");
        Ok(proposal.clone())
    }

    async fn list(
        &self,
        owner: &OwnerId,
        status: Option<ProposalStatus>,
        limit: usize,
    ) -> ApprovalResult<Vec<Proposal>> {
        let proposals = self.proposals.lock().await;

        let mut matching: Vec<Proposal> = proposals
            .values()
            .filter(|p| &p.owner == owner)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.min(MAX_PAGE_SIZE));

        Ok(matching)
    }

    async fn pending_count(&self, owner: &OwnerId) -> ApprovalResult<usize> {
        let proposals = self.proposals.lock().await;
        Ok(proposals
            .values()
            .filter(|p| &p.owner == owner && p.status == ProposalStatus::Pending)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgate_core::{ActionContext, ActionParams};
    use std::sync::Arc;

    fn proposal_for(owner: &OwnerId, campaign_id: &str) -> Proposal {
        Proposal::new(
            ActionParams::PauseCampaign {
                campaign_id: campaign_id.to_string(),
            },
            ActionContext {
                campaign_id: Some(campaign_id.to_string()),
                campaign_name: Some("Test Campaign".to_string()),
                account_id: Some("act_1".to_string()),
                adset_id: None,
            },
            "CTR below account average",
            owner.clone(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();

        let stored = store.create(proposal_for(&owner, "c1")).await.unwrap();
        let fetched = store.get(&stored.id, &owner).await.unwrap();

        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.status, ProposalStatus::Pending);
    }

    #[tokio::test]
    async fn test_foreign_owner_sees_not_found() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();
        let stored = store.create(proposal_for(&owner, "c1")).await.unwrap();

        let other = OwnerId::new();
        let err = store.get(&stored.id, &other).await.unwrap_err();
        assert!(matches!(err, ApprovalError::NotFound { .. }));

        let err = store
            .decide(&stored.id, &other, Decision::Approve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decide_is_not_idempotent() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();
        let stored = store.create(proposal_for(&owner, "c1")).await.unwrap();

        let approved = store
            .decide(&stored.id, &owner, Decision::Approve, None)
            .await
            .unwrap();
        assert_eq!(approved.status, ProposalStatus::Approved);
        assert!(approved.decided_at.is_some());

        let err = store
            .decide(&stored.id, &owner, Decision::Approve, None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApprovalError::InvalidState { current, .. } if current == ProposalStatus::Approved)
        );
    }

    #[tokio::test]
    async fn test_reject_records_note_verbatim() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();
        let stored = store.create(proposal_for(&owner, "c2")).await.unwrap();

        let rejected = store
            .decide(&stored.id, &owner, Decision::Reject, Some("keep running"))
            .await
            .unwrap();
        assert_eq!(rejected.status, ProposalStatus::Rejected);
        assert_eq!(rejected.outcome.as_deref(), Some("keep running"));

        let err = store
            .decide(&stored.id, &owner, Decision::Approve, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_decide_exactly_one_success() {
        let store = Arc::new(MemoryProposalStore::new());
        let owner = OwnerId::new();
        let stored = store.create(proposal_for(&owner, "c1")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = stored.id.clone();
            let owner = owner.clone();
            handles.push(tokio::spawn(async move {
                store.decide(&id, &owner, Decision::Approve, None).await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(ApprovalError::InvalidState { .. })))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(losers, 7);
    }

    #[tokio::test]
    async fn test_record_outcome_requires_approved() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();
        let stored = store.create(proposal_for(&owner, "c1")).await.unwrap();

        let err = store
            .record_outcome(&stored.id, true, "done")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApprovalError::InvalidState { current, .. } if current == ProposalStatus::Pending)
        );

        store
            .decide(&stored.id, &owner, Decision::Approve, None)
            .await
            .unwrap();
        let executed = store
            .record_outcome(&stored.id, true, "Campaign c1 paused")
            .await
            .unwrap();
        assert_eq!(executed.status, ProposalStatus::Executed);
        assert_eq!(executed.outcome.as_deref(), Some("Campaign c1 paused"));
        assert!(executed.executed_at.is_some());

        // Terminal: a second outcome is refused, the first stands.
        let err = store
            .record_outcome(&stored.id, false, "late failure")
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidState { .. }));
        let current = store.get(&stored.id, &owner).await.unwrap();
        assert_eq!(current.outcome.as_deref(), Some("Campaign c1 paused"));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_bounded() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();

        for i in 0..5i64 {
            let mut p = proposal_for(&owner, &format!("c{i}"));
            // Spread creation times so ordering is deterministic.
            p.created_at = Timestamp(p.created_at.0 + chrono::Duration::seconds(i));
            store.create(p).await.unwrap();
        }

        let listed = store.list(&owner, None, 3).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].created_at > listed[1].created_at);
        assert!(listed[1].created_at > listed[2].created_at);

        // A huge requested limit is clamped, not honored.
        let listed = store.list(&owner, None, usize::MAX).await.unwrap();
        assert_eq!(listed.len(), 5);
    }

    #[tokio::test]
    async fn test_list_status_filter_and_pending_count() {
        let store = MemoryProposalStore::new();
        let owner = OwnerId::new();

        let a = store.create(proposal_for(&owner, "c1")).await.unwrap();
        store.create(proposal_for(&owner, "c2")).await.unwrap();
        store
            .decide(&a.id, &owner, Decision::Reject, None)
            .await
            .unwrap();

        let pending = store
            .list(&owner, Some(ProposalStatus::Pending), 50)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(store.pending_count(&owner).await.unwrap(), 1);

        let other = OwnerId::new();
        assert_eq!(store.pending_count(&other).await.unwrap(), 0);
    }
}
