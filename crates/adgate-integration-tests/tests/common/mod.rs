//! Shared test harness for integration tests.

use std::sync::Arc;

use adgate_agent::CampaignAnalyst;
use adgate_approval::{ApprovalGateway, MemoryProposalStore, ProposalExecutor, ProposalStore};
use adgate_core::{ActionContext, ActionParams, OwnerId, Proposal};
use adgate_llm::LlmProvider;
use adgate_meta::{ActionExecutor, AdPlatform};
use adgate_test::{MockAdPlatform, MockLlmProvider, MockLlmTurn, MockToolCall};

/// Wires a scripted model, an in-memory ledger, the approval gateway and a
/// scripted ad platform into one pipeline.
pub struct PipelineHarness {
    /// The agent under test.
    #[allow(dead_code)]
    pub analyst: CampaignAnalyst,
    /// The shared ledger.
    pub store: Arc<MemoryProposalStore>,
    /// The gateway in front of the ledger.
    pub gateway: ApprovalGateway,
    /// The scripted platform behind the executor.
    pub platform: Arc<MockAdPlatform>,
    /// The scripted model.
    #[allow(dead_code)]
    pub llm: Arc<MockLlmProvider>,
}

impl PipelineHarness {
    /// Build a harness with the given scripted model turns.
    pub fn new(turns: Vec<MockLlmTurn>) -> Self {
        let llm = Arc::new(MockLlmProvider::new(turns));
        let store = Arc::new(MemoryProposalStore::new());
        let platform = Arc::new(MockAdPlatform::new());

        let executor = Arc::new(ActionExecutor::new(
            Arc::clone(&platform) as Arc<dyn AdPlatform>
        ));
        let gateway = ApprovalGateway::new(
            Arc::clone(&store) as Arc<dyn ProposalStore>,
            executor as Arc<dyn ProposalExecutor>,
        );
        let analyst = CampaignAnalyst::new(
            Arc::clone(&llm) as Arc<dyn LlmProvider>,
            Arc::clone(&store) as Arc<dyn ProposalStore>,
        );

        Self {
            analyst,
            store,
            gateway,
            platform,
            llm,
        }
    }

    /// Seed the ledger with a pending proposal, bypassing the agent.
    pub async fn seed_proposal(
        &self,
        owner: &OwnerId,
        params: ActionParams,
        rationale: &str,
    ) -> Proposal {
        let campaign_id = params.campaign_id().to_string();
        let context = ActionContext {
            account_id: Some("act_1001".to_string()),
            campaign_id: Some(campaign_id),
            campaign_name: Some("Prospecting Broad".to_string()),
            adset_id: None,
        };
        let proposal = Proposal::new(params, context, rationale, owner.clone());
        self.store
            .create(proposal)
            .await
            .expect("seeding the ledger")
    }
}

/// A well-formed `pause_campaign` tool call.
#[allow(dead_code)]
pub fn pause_call(campaign_id: &str) -> MockToolCall {
    MockToolCall::new(
        "pause_campaign",
        serde_json::json!({
            "campaign_id": campaign_id,
            "campaign_name": "Prospecting Broad",
            "account_id": "act_1001",
            "reason": "ROAS 0.2 over the last 7 days",
        }),
    )
}

/// A well-formed `adjust_budget` tool call.
#[allow(dead_code)]
pub fn budget_call(campaign_id: &str, new_budget: f64) -> MockToolCall {
    MockToolCall::new(
        "adjust_budget",
        serde_json::json!({
            "campaign_id": campaign_id,
            "campaign_name": "Prospecting Broad",
            "account_id": "act_1001",
            "new_budget": new_budget,
            "reason": "Scaling the winner",
        }),
    )
}
