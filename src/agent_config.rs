//! Agent configuration: which model plays white and how the turn is paced.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the remote agent.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name (shown in the UI and logs).
    #[serde(default = "default_name")]
    name: String,

    /// LLM provider (openai, anthropic or gemini).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature; low values give steadier play.
    #[serde(default = "default_temperature")]
    llm_temperature: f32,

    /// Seconds to wait for a move before falling back to a random one.
    #[serde(default = "default_move_timeout_secs")]
    move_timeout_secs: u64,

    /// Milliseconds to pause before the agent starts thinking.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,
}

fn default_name() -> String {
    "Gomoku Agent".to_string()
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.1
}

fn default_move_timeout_secs() -> u64 {
    60
}

fn default_think_delay_ms() -> u64 {
    500
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_temperature: default_temperature(),
            move_timeout_secs: default_move_timeout_secs(),
            think_delay_ms: default_think_delay_ms(),
        }
    }
}

impl AgentConfig {
    /// Creates a configuration for `provider` and `model`, other fields defaulted.
    #[instrument(skip(name), fields(agent_name = %name))]
    pub fn with_llm(name: String, provider: LlmProvider, model: String) -> Self {
        Self {
            name,
            llm_provider: provider,
            llm_model: model,
            ..Self::default()
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(agent_name = %config.name, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if given, otherwise returns the defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Provider-boundary timeout for one move request.
    pub fn move_timeout(&self) -> Duration {
        Duration::from_secs(self.move_timeout_secs)
    }

    /// Pause before the agent turn begins.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Creates LLM configuration from this agent config.
    /// Requires OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.llm_temperature,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AgentConfig::from_toml("").unwrap();
        assert_eq!(config.name(), "Gomoku Agent");
        assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
        assert_eq!(config.think_delay(), Duration::from_millis(500));
        assert_eq!(config.move_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = AgentConfig::from_toml(
            r#"
            name = "Claude White"
            llm_provider = "anthropic"
            llm_model = "claude-3-5-haiku-20241022"
            think_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.name(), "Claude White");
        assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
        assert_eq!(config.think_delay(), Duration::ZERO);
        assert_eq!(*config.llm_max_tokens(), 1024);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = AgentConfig::from_toml(r#"llm_provider = "llama""#).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }
}
