//! Adgate Agent - The campaign-analysis orchestrator.
//!
//! Drives the multi-turn conversation with the language model, validates
//! tool calls through the action catalog, and turns accepted calls into
//! pending proposals in the ledger. The agent can suggest but never act:
//! proposal creation is the only side effect a tool call has.
//!
//! Two operating modes share the loop:
//! - [`CampaignAnalyst::analyze`]: batch analysis, runs to completion
//! - [`CampaignAnalyst::chat`]: streams [`ChatFrame`]s to the caller while
//!   tool handling proceeds between model turns

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;
pub mod prompt;

mod analyst;
mod error;

pub use analyst::{AnalysisReport, CampaignAnalyst, ChatFrame, ChatStream};
pub use error::{AgentError, AgentResult};
