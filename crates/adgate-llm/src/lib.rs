//! Adgate LLM - Language-model provider abstraction with streaming support.
//!
//! This crate provides:
//! - The [`LlmProvider`] trait: streaming and non-streaming completion over
//!   a conversation with tool definitions
//! - Message, tool-call, and stream-event types shared by the orchestrator
//! - [`ClaudeProvider`]: the Anthropic Messages API implementation (SSE)
//!
//! Providers are plain values constructed from an explicit
//! [`ProviderConfig`] and passed into the orchestrator; there is no global
//! client or ambient configuration.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

mod claude;
mod error;
mod provider;
mod types;

pub use claude::ClaudeProvider;
pub use error::{LlmError, LlmResult};
pub use provider::{LlmProvider, ProviderConfig, StreamBox};
pub use types::{
    LlmResponse, Message, MessageContent, MessageRole, StopReason, StreamEvent, ToolCall,
    ToolCallResult, ToolDefinition, Usage,
};
