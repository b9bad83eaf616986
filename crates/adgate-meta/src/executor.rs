//! Maps approved proposals to platform calls.

use std::sync::Arc;

use adgate_approval::{ExecutionOutcome, ProposalExecutor};
use adgate_core::{ActionParams, Proposal};
use async_trait::async_trait;
use tracing::info;

use crate::platform::AdPlatform;

/// Executes an approved proposal as exactly one platform call.
///
/// The match over [`ActionParams`] is exhaustive: a new action kind will
/// not compile until it is wired here. The executor never touches proposal
/// state; it reports an outcome and the caller records it.
pub struct ActionExecutor {
    platform: Arc<dyn AdPlatform>,
}

impl ActionExecutor {
    /// Create an executor over a platform implementation.
    pub fn new(platform: Arc<dyn AdPlatform>) -> Self {
        Self { platform }
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProposalExecutor for ActionExecutor {
    async fn execute(&self, proposal: &Proposal) -> ExecutionOutcome {
        info!(id = %proposal.id, kind = ?proposal.action_kind(), "Executing proposal");

        let result = match &proposal.params {
            ActionParams::PauseCampaign { campaign_id } => self
                .platform
                .pause_campaign(campaign_id)
                .await
                .map(|()| format!("Campaign {campaign_id} paused")),

            ActionParams::EnableCampaign { campaign_id } => self
                .platform
                .enable_campaign(campaign_id)
                .await
                .map(|()| format!("Campaign {campaign_id} enabled")),

            ActionParams::AdjustBudget {
                campaign_id,
                new_budget,
                ..
            } => self
                .platform
                .set_campaign_daily_budget(campaign_id, *new_budget)
                .await
                .map(|()| {
                    format!("Daily budget of campaign {campaign_id} set to {new_budget:.2}")
                }),

            ActionParams::AdjustBid {
                adset_id, new_bid, ..
            } => self
                .platform
                .set_adset_bid(adset_id, *new_bid)
                .await
                .map(|()| format!("Bid of ad set {adset_id} set to {new_bid:.2}")),
        };

        match result {
            Ok(message) => ExecutionOutcome::success(message),
            // The platform's message goes back verbatim; no retry here.
            Err(e) => ExecutionOutcome::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MetaError, MetaResult};
    use adgate_core::{ActionContext, OwnerId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlatform {
        fail_next: bool,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingPlatform {
        fn record(&self, call: String) -> MetaResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_next {
                Err(MetaError::ApiRequestFailed {
                    status: 400,
                    message: "(#100) Invalid parameter".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl AdPlatform for RecordingPlatform {
        async fn pause_campaign(&self, campaign_id: &str) -> MetaResult<()> {
            self.record(format!("pause:{campaign_id}"))
        }

        async fn enable_campaign(&self, campaign_id: &str) -> MetaResult<()> {
            self.record(format!("enable:{campaign_id}"))
        }

        async fn set_campaign_daily_budget(&self, campaign_id: &str, budget: f64) -> MetaResult<()> {
            self.record(format!("budget:{campaign_id}:{budget}"))
        }

        async fn set_adset_bid(&self, adset_id: &str, bid: f64) -> MetaResult<()> {
            self.record(format!("bid:{adset_id}:{bid}"))
        }
    }

    fn proposal(params: ActionParams) -> Proposal {
        Proposal::new(params, ActionContext::default(), "test rationale", OwnerId::new())
    }

    #[tokio::test]
    async fn test_budget_adjustment_reports_amount_and_campaign() {
        let platform = Arc::new(RecordingPlatform::default());
        let executor = ActionExecutor::new(Arc::clone(&platform) as Arc<dyn AdPlatform>);

        let outcome = executor
            .execute(&proposal(ActionParams::AdjustBudget {
                campaign_id: "c1".to_string(),
                new_budget: 150.0,
                current_budget: None,
            }))
            .await;

        assert!(outcome.success);
        assert!(outcome.message.contains("150.00"));
        assert!(outcome.message.contains("c1"));
        assert_eq!(platform.calls.lock().unwrap().as_slice(), ["budget:c1:150"]);
    }

    #[tokio::test]
    async fn test_each_kind_maps_to_one_call() {
        let platform = Arc::new(RecordingPlatform::default());
        let executor = ActionExecutor::new(Arc::clone(&platform) as Arc<dyn AdPlatform>);

        executor
            .execute(&proposal(ActionParams::PauseCampaign {
                campaign_id: "c1".to_string(),
            }))
            .await;
        executor
            .execute(&proposal(ActionParams::EnableCampaign {
                campaign_id: "c2".to_string(),
            }))
            .await;
        executor
            .execute(&proposal(ActionParams::AdjustBid {
                adset_id: "a1".to_string(),
                campaign_id: "c3".to_string(),
                new_bid: 2.5,
            }))
            .await;

        assert_eq!(
            platform.calls.lock().unwrap().as_slice(),
            ["pause:c1", "enable:c2", "bid:a1:2.5"]
        );
    }

    #[tokio::test]
    async fn test_platform_failure_reports_message_verbatim() {
        let platform = Arc::new(RecordingPlatform {
            fail_next: true,
            calls: Mutex::new(Vec::new()),
        });
        let executor = ActionExecutor::new(Arc::clone(&platform) as Arc<dyn AdPlatform>);

        let outcome = executor
            .execute(&proposal(ActionParams::PauseCampaign {
                campaign_id: "c1".to_string(),
            }))
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("(#100) Invalid parameter"));
    }
}
