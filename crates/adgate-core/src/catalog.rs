//! Action catalog: the tool surface presented to the language model and the
//! single validation choke point for tool arguments.
//!
//! Every tool call passes through [`validate`] before a proposal may be
//! created. Unknown tools, unknown fields, missing required fields, and
//! out-of-range amounts are all rejected here, so malformed or
//! underspecified proposals never reach the ledger.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::action::{ActionContext, ActionKind, ActionParams};

/// Errors from catalog validation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The tool name does not belong to the catalog.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// The name the model used.
        name: String,
    },

    /// Arguments failed schema validation for the named kind.
    #[error("invalid arguments for {kind}: {message}")]
    SchemaError {
        /// The action kind being validated.
        kind: ActionKind,
        /// What was wrong with the arguments.
        message: String,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A tool definition shaped for presentation to the language model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name (`pause_campaign`, …).
    pub name: &'static str,
    /// Natural-language description including usage guidance.
    pub description: &'static str,
    /// JSON schema for the tool's input object.
    pub input_schema: Value,
}

/// Output of [`validate`]: the structured pieces a proposal is built from.
#[derive(Debug, Clone)]
pub struct ValidatedAction {
    /// Typed execution parameters.
    pub params: ActionParams,
    /// Denormalized display identifiers.
    pub context: ActionContext,
    /// The agent's justification (the tool's `reason` field).
    pub rationale: String,
}

/// Describe the full catalog for the language model.
#[must_use]
pub fn describe() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: ActionKind::PauseCampaign.tool_name(),
            description: "Pause a campaign that is performing poorly. Use when: \
                ROAS < 0.5, CPC far above benchmark (>3x), or high spend with \
                zero conversions.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "campaign_id": {"type": "string", "description": "Platform campaign ID"},
                    "campaign_name": {"type": "string", "description": "Campaign display name"},
                    "account_id": {"type": "string", "description": "Ad account ID"},
                    "reason": {"type": "string", "description": "Detailed justification for pausing"},
                },
                "required": ["campaign_id", "campaign_name", "account_id", "reason"],
            }),
        },
        ToolSpec {
            name: ActionKind::EnableCampaign.tool_name(),
            description: "Re-enable a paused campaign that shows potential or \
                was in a planned holding period.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "campaign_id": {"type": "string", "description": "Platform campaign ID"},
                    "campaign_name": {"type": "string", "description": "Campaign display name"},
                    "account_id": {"type": "string", "description": "Ad account ID"},
                    "reason": {"type": "string", "description": "Justification for enabling"},
                },
                "required": ["campaign_id", "campaign_name", "account_id", "reason"],
            }),
        },
        ToolSpec {
            name: ActionKind::AdjustBudget.tool_name(),
            description: "Adjust a campaign's daily budget. Raise budgets on \
                campaigns with high ROAS (>2x) and lower them where ROAS is poor.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "campaign_id": {"type": "string", "description": "Platform campaign ID"},
                    "campaign_name": {"type": "string", "description": "Campaign display name"},
                    "account_id": {"type": "string", "description": "Ad account ID"},
                    "current_budget": {"type": "number", "description": "Current daily budget, major currency units"},
                    "new_budget": {"type": "number", "description": "Proposed daily budget, major currency units"},
                    "reason": {"type": "string", "description": "Justification backed by the metrics"},
                },
                "required": ["campaign_id", "campaign_name", "account_id", "new_budget", "reason"],
            }),
        },
        ToolSpec {
            name: ActionKind::AdjustBid.tool_name(),
            description: "Adjust an ad set's bid to improve placement or \
                reduce cost.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "adset_id": {"type": "string", "description": "Platform ad set ID"},
                    "campaign_id": {"type": "string", "description": "Parent campaign ID"},
                    "campaign_name": {"type": "string", "description": "Campaign display name"},
                    "account_id": {"type": "string", "description": "Ad account ID"},
                    "new_bid": {"type": "number", "description": "Proposed bid, major currency units"},
                    "reason": {"type": "string", "description": "Justification for the bid change"},
                },
                "required": ["adset_id", "campaign_id", "campaign_name", "account_id", "new_bid", "reason"],
            }),
        },
    ]
}

// Raw argument shapes, one per kind. `deny_unknown_fields` makes extra
// fields a schema error rather than silently dropping them.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PauseArgs {
    campaign_id: String,
    campaign_name: String,
    account_id: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnableArgs {
    campaign_id: String,
    campaign_name: String,
    account_id: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BudgetArgs {
    campaign_id: String,
    campaign_name: String,
    account_id: String,
    #[serde(default)]
    current_budget: Option<f64>,
    new_budget: f64,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BidArgs {
    adset_id: String,
    campaign_id: String,
    campaign_name: String,
    account_id: String,
    new_bid: f64,
    reason: String,
}

/// Validate raw tool arguments against the schema for `tool_name`.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownTool`] for a name outside the catalog and
/// [`CatalogError::SchemaError`] for missing/unknown fields, empty required
/// strings, or out-of-range amounts.
pub fn validate(tool_name: &str, arguments: &Value) -> CatalogResult<ValidatedAction> {
    let kind = match tool_name {
        "pause_campaign" => ActionKind::PauseCampaign,
        "enable_campaign" => ActionKind::EnableCampaign,
        "adjust_budget" => ActionKind::AdjustBudget,
        "adjust_bid" => ActionKind::AdjustBid,
        other => {
            return Err(CatalogError::UnknownTool {
                name: other.to_string(),
            })
        }
    };

    match kind {
        ActionKind::PauseCampaign => {
            let args: PauseArgs = parse(kind, arguments)?;
            require_non_empty(kind, "campaign_id", &args.campaign_id)?;
            require_non_empty(kind, "reason", &args.reason)?;
            Ok(ValidatedAction {
                params: ActionParams::PauseCampaign {
                    campaign_id: args.campaign_id.clone(),
                },
                context: ActionContext {
                    account_id: Some(args.account_id),
                    campaign_id: Some(args.campaign_id),
                    campaign_name: Some(args.campaign_name),
                    adset_id: None,
                },
                rationale: args.reason,
            })
        }
        ActionKind::EnableCampaign => {
            let args: EnableArgs = parse(kind, arguments)?;
            require_non_empty(kind, "campaign_id", &args.campaign_id)?;
            require_non_empty(kind, "reason", &args.reason)?;
            Ok(ValidatedAction {
                params: ActionParams::EnableCampaign {
                    campaign_id: args.campaign_id.clone(),
                },
                context: ActionContext {
                    account_id: Some(args.account_id),
                    campaign_id: Some(args.campaign_id),
                    campaign_name: Some(args.campaign_name),
                    adset_id: None,
                },
                rationale: args.reason,
            })
        }
        ActionKind::AdjustBudget => {
            let args: BudgetArgs = parse(kind, arguments)?;
            require_non_empty(kind, "campaign_id", &args.campaign_id)?;
            require_non_empty(kind, "reason", &args.reason)?;
            require_amount(kind, "new_budget", args.new_budget, false)?;
            Ok(ValidatedAction {
                params: ActionParams::AdjustBudget {
                    campaign_id: args.campaign_id.clone(),
                    new_budget: args.new_budget,
                    current_budget: args.current_budget,
                },
                context: ActionContext {
                    account_id: Some(args.account_id),
                    campaign_id: Some(args.campaign_id),
                    campaign_name: Some(args.campaign_name),
                    adset_id: None,
                },
                rationale: args.reason,
            })
        }
        ActionKind::AdjustBid => {
            let args: BidArgs = parse(kind, arguments)?;
            require_non_empty(kind, "adset_id", &args.adset_id)?;
            require_non_empty(kind, "campaign_id", &args.campaign_id)?;
            require_non_empty(kind, "reason", &args.reason)?;
            require_amount(kind, "new_bid", args.new_bid, true)?;
            Ok(ValidatedAction {
                params: ActionParams::AdjustBid {
                    adset_id: args.adset_id.clone(),
                    campaign_id: args.campaign_id.clone(),
                    new_bid: args.new_bid,
                },
                context: ActionContext {
                    account_id: Some(args.account_id),
                    campaign_id: Some(args.campaign_id),
                    campaign_name: Some(args.campaign_name),
                    adset_id: Some(args.adset_id),
                },
                rationale: args.reason,
            })
        }
    }
}

fn parse<'de, T: Deserialize<'de>>(kind: ActionKind, arguments: &'de Value) -> CatalogResult<T> {
    T::deserialize(arguments).map_err(|e| CatalogError::SchemaError {
        kind,
        message: e.to_string(),
    })
}

fn require_non_empty(kind: ActionKind, field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::SchemaError {
            kind,
            message: format!("field `{field}` must not be empty"),
        });
    }
    Ok(())
}

fn require_amount(
    kind: ActionKind,
    field: &str,
    value: f64,
    strictly_positive: bool,
) -> CatalogResult<()> {
    let bad = !value.is_finite() || value < 0.0 || (strictly_positive && value == 0.0);
    if bad {
        return Err(CatalogError::SchemaError {
            kind,
            message: format!("field `{field}` out of range: {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_lists_four_tools() {
        let specs = describe();
        assert_eq!(specs.len(), 4);
        let names: Vec<_> = specs.iter().map(|s| s.name).collect();
        assert!(names.contains(&"pause_campaign"));
        assert!(names.contains(&"adjust_bid"));
    }

    #[test]
    fn test_validate_pause() {
        let action = validate(
            "pause_campaign",
            &json!({
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "reason": "ROAS 0.3 over the last 7 days",
            }),
        )
        .unwrap();

        assert_eq!(action.params.kind(), ActionKind::PauseCampaign);
        assert_eq!(action.context.campaign_name.as_deref(), Some("Spring Sale"));
        assert!(action.rationale.contains("ROAS"));
    }

    #[test]
    fn test_validate_unknown_tool() {
        let err = validate("duplicate_adset", &json!({})).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownTool { .. }));
    }

    #[test]
    fn test_validate_missing_required_field() {
        // adjust_bid without new_bid
        let err = validate(
            "adjust_bid",
            &json!({
                "adset_id": "a1",
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "reason": "bid too low",
            }),
        )
        .unwrap_err();

        assert!(matches!(err, CatalogError::SchemaError { .. }));
        assert!(err.to_string().contains("new_bid"));
    }

    #[test]
    fn test_validate_rejects_unknown_fields() {
        let err = validate(
            "pause_campaign",
            &json!({
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "reason": "poor performance",
                "force": true,
            }),
        )
        .unwrap_err();

        assert!(matches!(err, CatalogError::SchemaError { .. }));
    }

    #[test]
    fn test_validate_negative_budget() {
        let err = validate(
            "adjust_budget",
            &json!({
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "new_budget": -10.0,
                "reason": "cut spend",
            }),
        )
        .unwrap_err();

        assert!(err.to_string().contains("new_budget"));
    }

    #[test]
    fn test_validate_zero_bid() {
        let err = validate(
            "adjust_bid",
            &json!({
                "adset_id": "a1",
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "new_bid": 0.0,
                "reason": "reduce cost",
            }),
        )
        .unwrap_err();

        assert!(err.to_string().contains("new_bid"));
    }

    #[test]
    fn test_validate_empty_reason() {
        let err = validate(
            "enable_campaign",
            &json!({
                "campaign_id": "c1",
                "campaign_name": "Spring Sale",
                "account_id": "act_1",
                "reason": "   ",
            }),
        )
        .unwrap_err();

        assert!(err.to_string().contains("reason"));
    }

    #[test]
    fn test_schema_self_consistency() {
        // Arguments shaped exactly like each schema's required set validate.
        for spec in describe() {
            let required = spec.input_schema["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect::<Vec<_>>();

            let mut args = serde_json::Map::new();
            for field in &required {
                let prop_type = spec.input_schema["properties"][field]["type"]
                    .as_str()
                    .unwrap();
                let value = match prop_type {
                    "number" => json!(42.5),
                    _ => json!(format!("{field}-value")),
                };
                args.insert(field.clone(), value);
            }

            validate(spec.name, &Value::Object(args))
                .unwrap_or_else(|e| panic!("schema for {} not self-consistent: {e}", spec.name));
        }
    }
}
