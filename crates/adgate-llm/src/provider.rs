//! The LLM provider trait.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;

use crate::error::LlmResult;
use crate::types::{LlmResponse, Message, StreamEvent, ToolDefinition};

/// Type alias for boxed event streams.
pub type StreamBox = Pin<Box<dyn Stream<Item = LlmResult<StreamEvent>> + Send>>;

/// A language-model provider.
///
/// Implementors supply streaming and non-streaming completion over a
/// conversation plus tool definitions. The orchestrator is generic over
/// this trait, so tests script turns with a mock instead of a live API.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Model identifier in use.
    fn model(&self) -> &str;

    /// Stream a completion as a sequence of [`StreamEvent`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be started; errors during
    /// generation surface as stream items.
    async fn stream(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        system: &str,
    ) -> LlmResult<StreamBox>;

    /// Complete without streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        system: &str,
    ) -> LlmResult<LlmResponse>;
}

/// Blanket implementation so `Box<dyn LlmProvider>` satisfies
/// `P: LlmProvider` bounds.
#[async_trait]
impl LlmProvider for Box<dyn LlmProvider> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    async fn stream(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        system: &str,
    ) -> LlmResult<StreamBox> {
        (**self).stream(messages, tools, system).await
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        system: &str,
    ) -> LlmResult<LlmResponse> {
        (**self).complete(messages, tools, system).await
    }
}

/// Configuration for LLM providers.
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// API base URL override (for test servers).
    pub base_url: Option<String>,
    /// Deadline for each model call.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("has_base_url", &self.base_url.is_some())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a new config with API key and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
            base_url: None,
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Set max tokens.
    #[must_use]
    pub fn max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-call deadline.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
