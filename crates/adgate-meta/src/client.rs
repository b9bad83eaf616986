//! Meta Graph API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{MetaError, MetaResult};
use crate::platform::AdPlatform;

const GRAPH_API_URL: &str = "https://graph.facebook.com";
const GRAPH_API_VERSION: &str = "v21.0";

/// Convert a currency-major-unit amount to the Graph API's integer minor
/// units (cents). Amounts are validated non-negative upstream.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_minor_units(major: f64) -> u64 {
    (major * 100.0).round() as u64
}

/// Configuration for the Graph API client.
#[derive(Clone)]
pub struct MetaClientConfig {
    /// OAuth access token for the Graph API.
    pub access_token: String,
    /// Graph API version segment, e.g. `v21.0`.
    pub api_version: String,
    /// Base URL override (for tests).
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl MetaClientConfig {
    /// Create a configuration with default version and timeout.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_version: GRAPH_API_VERSION.to_string(),
            base_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Override the Graph API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for MetaClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaClientConfig")
            .field("access_token", &"***")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Graph API implementation of [`AdPlatform`].
///
/// Each operation is one `POST /<version>/<object-id>` update. Platform
/// error messages are passed through verbatim so they land unchanged in the
/// proposal's outcome.
#[derive(Debug)]
pub struct MetaGraphClient {
    client: Client,
    config: MetaClientConfig,
}

impl MetaGraphClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: MetaClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn update_url(&self, object_id: &str) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(GRAPH_API_URL);
        format!("{base}/{}/{object_id}", self.config.api_version)
    }

    /// POST a field update to a Graph object.
    async fn update(&self, object_id: &str, params: &[(&str, String)]) -> MetaResult<()> {
        if self.config.access_token.is_empty() {
            return Err(MetaError::AccessTokenNotConfigured);
        }

        let url = self.update_url(object_id);
        debug!(object_id, "Posting Graph API update");

        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("access_token", self.config.access_token.clone()));

        let send = self.client.post(&url).form(&form).send();
        let response = tokio::time::timeout(self.config.request_timeout, send)
            .await
            .map_err(|_| MetaError::Timeout {
                timeout_secs: self.config.request_timeout.as_secs(),
            })??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            error!(object_id, status = %status, message, "Graph API update rejected");
            return Err(MetaError::ApiRequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Pull the human-readable message out of a Graph API error body, falling
/// back to the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| body.to_string(), ToString::to_string)
}

#[async_trait]
impl AdPlatform for MetaGraphClient {
    async fn pause_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        self.update(campaign_id, &[("status", "PAUSED".to_string())])
            .await
    }

    async fn enable_campaign(&self, campaign_id: &str) -> MetaResult<()> {
        self.update(campaign_id, &[("status", "ACTIVE".to_string())])
            .await
    }

    async fn set_campaign_daily_budget(&self, campaign_id: &str, budget: f64) -> MetaResult<()> {
        let cents = to_minor_units(budget);
        self.update(campaign_id, &[("daily_budget", cents.to_string())])
            .await
    }

    async fn set_adset_bid(&self, adset_id: &str, bid: f64) -> MetaResult<()> {
        let cents = to_minor_units(bid);
        self.update(adset_id, &[("bid_amount", cents.to_string())])
            .await
    }
}
