//! Settings types, loading, and validation.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Anthropic model settings.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnthropicSettings {
    /// API key. Usually supplied via `ANTHROPIC_API_KEY`.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens per completion.
    pub max_tokens: usize,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
        }
    }
}

impl std::fmt::Debug for AnthropicSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicSettings")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Meta Graph API settings.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetaSettings {
    /// OAuth access token. Usually supplied via `META_ACCESS_TOKEN`.
    pub access_token: String,
    /// Graph API version segment.
    pub api_version: String,
    /// Base URL override (for tests).
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for MetaSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_version: "v21.0".to_string(),
            base_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for MetaSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaSettings")
            .field("has_access_token", &!self.access_token.is_empty())
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentSettings {
    /// Maximum tool-dispatch rounds per request.
    pub max_tool_rounds: usize,
    /// Timeout for each model call, in seconds.
    pub llm_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            llm_timeout_secs: 120,
        }
    }
}

/// All settings for the assistant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Anthropic section.
    pub anthropic: AnthropicSettings,
    /// Meta section.
    pub meta: MetaSettings,
    /// Orchestrator section.
    pub agent: AgentSettings,
}

impl Settings {
    /// Load settings: TOML file (if given and present), then environment
    /// overlay, then validation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable or malformed, or
    /// if the merged settings fail validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        let env: HashMap<String, String> = std::env::vars().collect();
        settings.apply_env(&env);
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

        info!(path = %path.display(), "Loaded config file");
        Ok(settings)
    }

    /// Overlay credentials from the environment onto unset fields.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) {
        if self.anthropic.api_key.is_empty() {
            if let Some(key) = env.get("ANTHROPIC_API_KEY") {
                self.anthropic.api_key.clone_from(key);
            }
        }
        if self.meta.access_token.is_empty() {
            if let Some(token) = env.get("META_ACCESS_TOKEN") {
                self.meta.access_token.clone_from(token);
            }
        }
    }

    /// Check field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.anthropic.max_tokens == 0 {
            return Err(ConfigError::ValidationError {
                field: "anthropic.max_tokens".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError {
                field: "agent.max_tool_rounds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.agent.llm_timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                field: "agent.llm_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.meta.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                field: "meta.request_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.agent.max_tool_rounds, 8);
        assert_eq!(settings.meta.api_version, "v21.0");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adgate.toml");
        std::fs::write(
            &path,
            r#"
            [anthropic]
            api_key = "sk-test"
            max_tokens = 2048

            [agent]
            max_tool_rounds = 3
        "#,
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.anthropic.api_key, "sk-test");
        assert_eq!(settings.anthropic.max_tokens, 2048);
        assert_eq!(settings.agent.max_tool_rounds, 3);
        // Untouched sections keep defaults.
        assert_eq!(settings.meta.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let settings = Settings::from_file(Path::new("/nonexistent/adgate.toml")).unwrap();
        assert_eq!(settings.agent.max_tool_rounds, 8);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adgate.toml");
        std::fs::write(&path, "[anthropic]\nmodle = \"typo\"\n").unwrap();

        let result = Settings::from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overlay_fills_unset_credentials() {
        let mut settings = Settings::default();
        let mut env = HashMap::new();
        env.insert("ANTHROPIC_API_KEY".to_string(), "sk-env".to_string());
        env.insert("META_ACCESS_TOKEN".to_string(), "EAAB-env".to_string());

        settings.apply_env(&env);
        assert_eq!(settings.anthropic.api_key, "sk-env");
        assert_eq!(settings.meta.access_token, "EAAB-env");

        // A file-provided key wins over the environment.
        settings.anthropic.api_key = "sk-file".to_string();
        settings.apply_env(&env);
        assert_eq!(settings.anthropic.api_key, "sk-file");
    }

    #[test]
    fn test_validation_rejects_zero_rounds() {
        let mut settings = Settings::default();
        settings.agent.max_tool_rounds = 0;
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "agent.max_tool_rounds"
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut settings = Settings::default();
        settings.anthropic.api_key = "sk-secret-12345".to_string();
        settings.meta.access_token = "EAAB-secret".to_string();

        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret-12345"));
        assert!(!debug.contains("EAAB-secret"));
        assert!(debug.contains("has_api_key: true"));
        assert!(debug.contains("has_access_token: true"));
    }
}
