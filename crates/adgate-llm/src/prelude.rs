//! Commonly used types for LLM integration.

pub use crate::claude::ClaudeProvider;
pub use crate::error::{LlmError, LlmResult};
pub use crate::provider::{LlmProvider, ProviderConfig, StreamBox};
pub use crate::types::{
    LlmResponse, Message, MessageContent, MessageRole, StopReason, StreamEvent, ToolCall,
    ToolCallResult, ToolDefinition, Usage,
};
