//! Shared test fixtures.

use adgate_core::CampaignSnapshot;

/// A plausible active campaign snapshot.
#[must_use]
pub fn sample_snapshot(campaign_id: &str, name: &str) -> CampaignSnapshot {
    CampaignSnapshot {
        campaign_id: campaign_id.to_string(),
        name: name.to_string(),
        account_id: "act_1001".to_string(),
        status: "ACTIVE".to_string(),
        spend: 420.75,
        impressions: 185_000,
        clicks: 3_100,
        ctr: 1.68,
        cpc: 0.14,
        conversions: 96,
        roas: 2.3,
        daily_budget: Some(60.0),
    }
}

/// A small portfolio: one strong performer, one weak, one paused.
#[must_use]
pub fn sample_snapshots() -> Vec<CampaignSnapshot> {
    let mut weak = sample_snapshot("c-weak", "Prospecting Broad");
    weak.spend = 310.0;
    weak.conversions = 1;
    weak.roas = 0.2;
    weak.cpc = 1.85;

    let mut paused = sample_snapshot("c-paused", "Holiday Retargeting");
    paused.status = "PAUSED".to_string();
    paused.spend = 0.0;
    paused.impressions = 0;
    paused.clicks = 0;
    paused.ctr = 0.0;
    paused.cpc = 0.0;
    paused.conversions = 0;
    paused.roas = 0.0;
    paused.daily_budget = None;

    vec![
        sample_snapshot("c-strong", "Spring Sale Lookalike"),
        weak,
        paused,
    ]
}
