//! The agentic loop: batch analysis and streaming chat.

use std::sync::Arc;

use adgate_approval::ProposalStore;
use adgate_core::{catalog, CampaignSnapshot, OwnerId, Proposal};
use adgate_llm::{
    LlmError, LlmProvider, Message, StopReason, StreamEvent, ToolCall, ToolCallResult,
    ToolDefinition,
};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};

use crate::error::AgentResult;
use crate::prompt;

/// Phases of one analysis request's conversation loop.
#[derive(Debug)]
enum LoopPhase {
    /// Waiting on the model.
    Thinking,
    /// The model returned tool calls; check the round bound.
    ToolDispatch(Vec<ToolCall>),
    /// Turning accepted tool calls into pending proposals.
    AwaitingToolResults(Vec<ToolCall>),
    /// The model produced its final answer.
    Responding,
    /// Loop finished.
    Done,
}

/// Result of a batch analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Accumulated model text across all turns.
    pub text: String,
    /// Number of proposals created during the run.
    pub proposals_created: usize,
    /// Whether the tool-round bound cut the loop short.
    pub truncated: bool,
}

/// One frame of the chat stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFrame {
    /// A chunk of model text, in generation order.
    Text(String),
    /// Boundary between model turns: tool calls were just handled.
    ToolRound {
        /// Proposals created in this round.
        proposals_created: usize,
    },
    /// Terminal sentinel. Always sent, exactly once, last.
    Done,
}

/// The stream a chat turn yields.
pub type ChatStream = UnboundedReceiverStream<ChatFrame>;

fn tool_definitions() -> Vec<ToolDefinition> {
    catalog::describe()
        .into_iter()
        .map(|spec| {
            ToolDefinition::new(spec.name)
                .with_description(spec.description)
                .with_schema(spec.input_schema)
        })
        .collect()
}

/// Drives conversations with the model and turns accepted tool calls into
/// pending proposals.
///
/// Holds no mutable state of its own; every dependency is passed in at
/// construction and shared behind `Arc`, so one analyst can serve
/// concurrent requests.
#[derive(Clone)]
pub struct CampaignAnalyst {
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn ProposalStore>,
    max_tool_rounds: usize,
}

impl CampaignAnalyst {
    /// Default bound on tool-dispatch rounds per request.
    pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

    /// Create an analyst over a model provider and a proposal ledger.
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<dyn ProposalStore>) -> Self {
        Self {
            llm,
            store,
            max_tool_rounds: Self::DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Override the tool-round bound.
    #[must_use]
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Run a batch analysis over the given snapshots.
    ///
    /// Returns the model's accumulated text and the number of proposals
    /// created. Proposals created before an error are not rolled back; they
    /// are valid pending records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AgentError::Model`] if a model call fails, or
    /// [`crate::AgentError::Ledger`] if a proposal cannot be stored.
    pub async fn analyze(
        &self,
        owner: &OwnerId,
        snapshots: &[CampaignSnapshot],
        custom_prompt: Option<&str>,
    ) -> AgentResult<AnalysisReport> {
        let tools = tool_definitions();
        let mut messages = vec![Message::user(prompt::analysis_prompt(
            snapshots,
            custom_prompt,
        ))];

        let mut text = String::new();
        let mut proposals_created: usize = 0;
        let mut truncated = false;
        let mut rounds: usize = 0;
        let mut phase = LoopPhase::Thinking;

        loop {
            phase = match phase {
                LoopPhase::Thinking => {
                    let response = self
                        .llm
                        .complete(&messages, &tools, prompt::SYSTEM_PROMPT)
                        .await?;

                    if !response.text.is_empty() {
                        if !text.is_empty() {
                            text.push_str("\n\n");
                        }
                        text.push_str(&response.text);
                    }

                    if response.has_tool_calls {
                        let calls = response
                            .message
                            .tool_calls()
                            .map(<[ToolCall]>::to_vec)
                            .unwrap_or_default();
                        messages.push(response.message);
                        LoopPhase::ToolDispatch(calls)
                    } else if response.stop_reason == StopReason::EndTurn
                        || response.stop_reason == StopReason::StopSequence
                    {
                        LoopPhase::Responding
                    } else {
                        // Abnormal stop (token budget exhausted): keep the
                        // partial text, attempt no further turns.
                        debug!(stop = ?response.stop_reason, "Abnormal stop, ending loop");
                        LoopPhase::Done
                    }
                }

                LoopPhase::ToolDispatch(calls) => {
                    rounds = rounds.saturating_add(1);
                    if rounds > self.max_tool_rounds {
                        warn!(rounds, "Tool-round bound exceeded, truncating analysis");
                        truncated = true;
                        if !text.is_empty() {
                            text.push_str("\n\n");
                        }
                        text.push_str("[Analysis stopped: tool-round limit reached.]");
                        LoopPhase::Done
                    } else {
                        LoopPhase::AwaitingToolResults(calls)
                    }
                }

                LoopPhase::AwaitingToolResults(calls) => {
                    let (results, created) = self.handle_tool_calls(owner, &calls).await?;
                    messages.extend(results);
                    proposals_created = proposals_created.saturating_add(created);
                    LoopPhase::Thinking
                }

                LoopPhase::Responding => LoopPhase::Done,

                LoopPhase::Done => break,
            };
        }

        info!(proposals_created, truncated, "Analysis finished");
        Ok(AnalysisReport {
            text,
            proposals_created,
            truncated,
        })
    }

    /// Run one chat turn, streaming frames to the caller.
    ///
    /// The producer runs on its own task and sends into an unbounded
    /// channel, so a slow consumer never stalls tool handling: tool results
    /// are always appended to the conversation before the next model turn
    /// begins. The stream always terminates with [`ChatFrame::Done`]; a
    /// mid-stream error becomes a final text frame before the sentinel.
    ///
    /// `history` is the prior conversation; snapshots are embedded only
    /// when it is empty (the first turn).
    #[must_use]
    pub fn chat(
        &self,
        owner: OwnerId,
        history: Vec<Message>,
        message: &str,
        snapshots: Vec<CampaignSnapshot>,
    ) -> ChatStream {
        let (tx, rx) = mpsc::unbounded_channel();

        let analyst = self.clone();
        let first_turn = history.is_empty();
        let mut messages = history;
        messages.push(Message::user(prompt::chat_prompt(
            message, &snapshots, first_turn,
        )));

        tokio::spawn(async move {
            if let Err(e) = analyst.chat_turn(&owner, messages, &tx).await {
                warn!(error = %e, "Chat turn failed");
                let _ = tx.send(ChatFrame::Text(format!("\n\nSomething went wrong: {e}")));
            }
            let _ = tx.send(ChatFrame::Done);
        });

        UnboundedReceiverStream::new(rx)
    }

    /// The streaming loop body. Text deltas are forwarded as they arrive;
    /// tool calls collected from a turn are handled before the next turn
    /// starts streaming.
    async fn chat_turn(
        &self,
        owner: &OwnerId,
        mut messages: Vec<Message>,
        tx: &mpsc::UnboundedSender<ChatFrame>,
    ) -> AgentResult<()> {
        let tools = tool_definitions();
        let mut rounds: usize = 0;

        loop {
            let mut stream = self
                .llm
                .stream(&messages, &tools, prompt::SYSTEM_PROMPT)
                .await?;

            let mut tool_calls: Vec<ToolCall> = Vec::new();
            let mut current_args = String::new();
            let mut abnormal_stop = false;

            while let Some(event) = stream.next().await {
                match event? {
                    StreamEvent::TextDelta(delta) => {
                        let _ = tx.send(ChatFrame::Text(delta));
                    }
                    StreamEvent::ToolCallStart { id, name } => {
                        tool_calls.push(ToolCall::new(id, name));
                        current_args.clear();
                    }
                    StreamEvent::ToolCallDelta { args_delta, .. } => {
                        current_args.push_str(&args_delta);
                    }
                    StreamEvent::ToolCallEnd { id } => {
                        if let Some(call) = tool_calls.iter_mut().find(|c| c.id == id) {
                            if let Ok(args) = serde_json::from_str(&current_args) {
                                call.arguments = args;
                            }
                        }
                        current_args.clear();
                    }
                    StreamEvent::Usage {
                        input_tokens,
                        output_tokens,
                    } => {
                        debug!(input = input_tokens, output = output_tokens, "Token usage");
                    }
                    StreamEvent::Stop(reason) => {
                        abnormal_stop = reason == StopReason::MaxTokens;
                    }
                    StreamEvent::Done => break,
                    StreamEvent::Error(e) => {
                        return Err(LlmError::StreamingError(e).into());
                    }
                }
            }

            if abnormal_stop || tool_calls.is_empty() {
                return Ok(());
            }

            rounds = rounds.saturating_add(1);
            if rounds > self.max_tool_rounds {
                warn!(rounds, "Tool-round bound exceeded, ending chat turn");
                let _ = tx.send(ChatFrame::Text(
                    "\n\n[Stopping here: tool-round limit reached.]".to_string(),
                ));
                return Ok(());
            }

            messages.push(Message::assistant_with_tools(tool_calls.clone()));
            let (results, created) = self.handle_tool_calls(owner, &tool_calls).await?;
            messages.extend(results);

            // Boundary: the caller can distinguish before-tools text from
            // the follow-up turn's text.
            let _ = tx.send(ChatFrame::ToolRound {
                proposals_created: created,
            });
        }
    }

    /// Validate each tool call and create a pending proposal for the valid
    /// ones. Invalid calls become error tool-results so the model can
    /// retry with corrected arguments; the loop continues either way.
    async fn handle_tool_calls(
        &self,
        owner: &OwnerId,
        calls: &[ToolCall],
    ) -> AgentResult<(Vec<Message>, usize)> {
        let mut results = Vec::with_capacity(calls.len());
        let mut created: usize = 0;

        for call in calls {
            let result = match catalog::validate(&call.name, &call.arguments) {
                Ok(action) => {
                    let proposal = Proposal::new(
                        action.params,
                        action.context,
                        action.rationale,
                        owner.clone(),
                    );
                    let stored = self.store.create(proposal).await?;
                    info!(id = %stored.id, kind = ?stored.action_kind(), "Proposal created");
                    ToolCallResult::success(
                        &call.id,
                        format!(
                            "Suggestion {} created: {}. Awaiting approval.",
                            stored.id,
                            stored.summary()
                        ),
                    )
                }
                Err(e) => {
                    debug!(tool = %call.name, error = %e, "Tool call failed validation");
                    ToolCallResult::error(&call.id, e.to_string())
                }
            };

            if !result.is_error {
                created = created.saturating_add(1);
            }
            results.push(Message::tool_result(result));
        }

        Ok((results, created))
    }
}

impl std::fmt::Debug for CampaignAnalyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignAnalyst")
            .field("model", &self.llm.model())
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish_non_exhaustive()
    }
}
