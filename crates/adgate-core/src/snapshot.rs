//! Campaign performance snapshots.
//!
//! Snapshots are produced by an external retrieval layer and consumed by
//! the orchestrator, which embeds them into the model prompt. They carry
//! no authority: execution only ever reads validated proposal parameters.

use serde::{Deserialize, Serialize};

/// A point-in-time view of one campaign's delivery and performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    /// Platform campaign ID.
    pub campaign_id: String,
    /// Campaign display name.
    pub name: String,
    /// Ad account the campaign belongs to.
    pub account_id: String,
    /// Delivery status as reported by the platform (`ACTIVE`, `PAUSED`, …).
    pub status: String,
    /// Spend over the reporting window, major currency units.
    pub spend: f64,
    /// Impressions over the window.
    pub impressions: u64,
    /// Clicks over the window.
    pub clicks: u64,
    /// Click-through rate, percent.
    pub ctr: f64,
    /// Cost per click, major currency units.
    pub cpc: f64,
    /// Conversions attributed over the window.
    pub conversions: u64,
    /// Return on ad spend (purchase value / spend).
    pub roas: f64,
    /// Configured daily budget, if the campaign uses one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization() {
        let snap = CampaignSnapshot {
            campaign_id: "c1".to_string(),
            name: "Spring Sale".to_string(),
            account_id: "act_1".to_string(),
            status: "ACTIVE".to_string(),
            spend: 320.5,
            impressions: 100_000,
            clicks: 1_500,
            ctr: 1.5,
            cpc: 0.21,
            conversions: 42,
            roas: 2.8,
            daily_budget: Some(50.0),
        };

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["campaign_id"], "c1");
        assert_eq!(json["roas"], 2.8);

        let back: CampaignSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_daily_budget_omitted_when_absent() {
        let snap = CampaignSnapshot {
            campaign_id: "c2".to_string(),
            name: "Retargeting".to_string(),
            account_id: "act_1".to_string(),
            status: "PAUSED".to_string(),
            spend: 0.0,
            impressions: 0,
            clicks: 0,
            ctr: 0.0,
            cpc: 0.0,
            conversions: 0,
            roas: 0.0,
            daily_budget: None,
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("daily_budget").is_none());
    }
}
