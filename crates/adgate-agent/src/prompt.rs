//! Prompt assembly for the analyst.

use adgate_core::CampaignSnapshot;

/// Snapshots embedded into a chat turn are capped; batch analysis embeds
/// everything it is given.
pub const MAX_CHAT_SNAPSHOTS: usize = 10;

/// System persona for both operating modes.
pub const SYSTEM_PROMPT: &str = "\
You are a senior paid-media specialist managing Meta Ads accounts. You \
analyze campaign performance data (spend, CTR, CPC, conversions, ROAS) and \
recommend concrete optimizations.

You can never change a campaign yourself. When an optimization is \
warranted, use the provided tools to create a suggestion; every suggestion \
requires explicit approval from the account owner before anything is \
applied. Always include a specific, metric-backed reason with each \
suggestion. When no action is warranted, say so and explain why.";

fn snapshots_block(snapshots: &[CampaignSnapshot]) -> String {
    serde_json::to_string_pretty(snapshots).unwrap_or_else(|_| "[]".to_string())
}

/// Build the user prompt for a batch analysis request.
#[must_use]
pub fn analysis_prompt(snapshots: &[CampaignSnapshot], custom_prompt: Option<&str>) -> String {
    let mut prompt = format!(
        "Analyze the performance of the following campaigns and create \
         optimization suggestions where the data supports them.\n\n\
         Campaign data:\n```json\n{}\n```",
        snapshots_block(snapshots)
    );

    if let Some(custom) = custom_prompt.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("\n\nAdditional instructions: ");
        prompt.push_str(custom);
    }

    prompt
}

/// Build the user prompt for a chat turn.
///
/// Campaign data is embedded only on the first turn of a conversation, and
/// capped at [`MAX_CHAT_SNAPSHOTS`] entries.
#[must_use]
pub fn chat_prompt(message: &str, snapshots: &[CampaignSnapshot], first_turn: bool) -> String {
    if !first_turn || snapshots.is_empty() {
        return message.to_string();
    }

    let shown = &snapshots[..snapshots.len().min(MAX_CHAT_SNAPSHOTS)];
    format!(
        "{message}\n\nCurrent campaign data:\n```json\n{}\n```",
        snapshots_block(shown)
    )
}
