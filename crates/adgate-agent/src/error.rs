//! Orchestrator error types.

use thiserror::Error;

/// Errors from the orchestrator.
///
/// Catalog validation failures are not represented here: they are fed back
/// into the conversation as error tool-results so the model can retry, and
/// never abort the loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language-model call failed or timed out.
    ///
    /// Aborts the current loop; the caller may retry the whole request.
    /// Proposals already created remain valid.
    #[error("Model call failed: {0}")]
    Model(#[from] adgate_llm::LlmError),

    /// The ledger rejected a proposal write.
    #[error("Ledger error: {0}")]
    Ledger(#[from] adgate_approval::ApprovalError),
}

/// Result type for orchestrator operations.
pub type AgentResult<T> = Result<T, AgentError>;
