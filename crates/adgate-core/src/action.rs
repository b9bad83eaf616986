//! The closed set of platform actions the agent may propose.
//!
//! [`ActionParams`] is the tagged union of execution parameters per action
//! kind. The set is deliberately fixed and small: new kinds are added here
//! and wired exhaustively through the catalog and the executor, never
//! inferred dynamically from free text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant for the fixed set of proposable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Pause a running campaign.
    PauseCampaign,
    /// Re-enable a paused campaign.
    EnableCampaign,
    /// Change a campaign's daily budget.
    AdjustBudget,
    /// Change an ad set's bid.
    AdjustBid,
}

impl ActionKind {
    /// Tool name surfaced to the language model for this kind.
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::PauseCampaign => "pause_campaign",
            Self::EnableCampaign => "enable_campaign",
            Self::AdjustBudget => "adjust_budget",
            Self::AdjustBid => "adjust_bid",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Execution parameters for one action, validated at proposal creation and
/// immutable afterwards.
///
/// Each variant carries exactly what the executor needs to make one
/// platform call. Monetary amounts are in currency major units; conversion
/// to the platform's minor units happens at the platform boundary only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ActionParams {
    /// Pause a running campaign.
    PauseCampaign {
        /// Platform campaign ID.
        campaign_id: String,
    },

    /// Re-enable a paused campaign.
    EnableCampaign {
        /// Platform campaign ID.
        campaign_id: String,
    },

    /// Set a campaign's daily budget.
    AdjustBudget {
        /// Platform campaign ID.
        campaign_id: String,
        /// New daily budget, currency major units.
        new_budget: f64,
        /// Budget at proposal time, carried for audit display only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_budget: Option<f64>,
    },

    /// Set an ad set's bid.
    AdjustBid {
        /// Platform ad set ID.
        adset_id: String,
        /// Parent campaign ID.
        campaign_id: String,
        /// New bid, currency major units.
        new_bid: f64,
    },
}

impl ActionParams {
    /// The kind this parameter set belongs to.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::PauseCampaign { .. } => ActionKind::PauseCampaign,
            Self::EnableCampaign { .. } => ActionKind::EnableCampaign,
            Self::AdjustBudget { .. } => ActionKind::AdjustBudget,
            Self::AdjustBid { .. } => ActionKind::AdjustBid,
        }
    }

    /// The campaign this action targets.
    #[must_use]
    pub fn campaign_id(&self) -> &str {
        match self {
            Self::PauseCampaign { campaign_id }
            | Self::EnableCampaign { campaign_id }
            | Self::AdjustBudget { campaign_id, .. }
            | Self::AdjustBid { campaign_id, .. } => campaign_id,
        }
    }
}

impl fmt::Display for ActionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PauseCampaign { campaign_id } => {
                write!(f, "pause campaign {campaign_id}")
            }
            Self::EnableCampaign { campaign_id } => {
                write!(f, "enable campaign {campaign_id}")
            }
            Self::AdjustBudget {
                campaign_id,
                new_budget,
                ..
            } => {
                write!(f, "set budget of campaign {campaign_id} to {new_budget:.2}/day")
            }
            Self::AdjustBid {
                adset_id, new_bid, ..
            } => {
                write!(f, "set bid of ad set {adset_id} to {new_bid:.2}")
            }
        }
    }
}

/// Denormalized human-readable identifiers carried on every proposal.
///
/// For audit and UI display only; execution reads [`ActionParams`], never
/// this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Ad account the action applies to.
    pub account_id: Option<String>,
    /// Campaign ID.
    pub campaign_id: Option<String>,
    /// Campaign display name.
    pub campaign_name: Option<String>,
    /// Ad set ID, for bid adjustments.
    pub adset_id: Option<String>,
}
