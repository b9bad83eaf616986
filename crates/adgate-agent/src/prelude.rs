//! Commonly used orchestrator types.

pub use crate::analyst::{AnalysisReport, CampaignAnalyst, ChatFrame, ChatStream};
pub use crate::error::{AgentError, AgentResult};
pub use crate::prompt::{MAX_CHAT_SNAPSHOTS, SYSTEM_PROMPT};
