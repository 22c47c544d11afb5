//! Main settings module

use crate::ConfigError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Model provider configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Session store configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Action executor configuration
    #[serde(default)]
    pub executor: ExecutorSettings,

    /// Path to the domain configuration file (YAML); empty means use the
    /// compiled-in standard HR domain
    #[serde(default)]
    pub domain_config_path: String,
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Low temperature keeps extraction output consistent
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "qwen3:4b-instruct-2507-q4_K_M".to_string()
}

fn default_llm_temperature() -> f32 {
    0.1
}

fn default_llm_max_tokens() -> usize {
    512
}

fn default_llm_timeout_secs() -> u64 {
    10
}

fn default_llm_max_retries() -> u32 {
    2
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
            max_retries: default_llm_max_retries(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Absolute TTL from last write, in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
    /// Reference-data (leave types) cache TTL, in seconds
    #[serde(default = "default_reference_ttl_secs")]
    pub reference_ttl_secs: u64,
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_reference_ttl_secs() -> u64 {
    1800
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            reference_ttl_secs: default_reference_ttl_secs(),
        }
    }
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn reference_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_ttl_secs)
    }
}

/// Action executor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorSettings {
    #[serde(default = "default_executor_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_executor_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_executor_endpoint() -> String {
    "http://localhost:8081/tools".to_string()
}

fn default_executor_timeout_secs() -> u64 {
    30
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            endpoint: default_executor_endpoint(),
            timeout_secs: default_executor_timeout_secs(),
        }
    }
}

impl ExecutorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load settings from an optional file plus HR_AGENT_ environment overrides.
///
/// Env keys use `__` as the section separator, e.g. `HR_AGENT_LLM__ENDPOINT`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("HR_AGENT").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    tracing::debug!(environment = ?settings.environment, "Settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.session.ttl_secs, 1800);
        assert_eq!(settings.executor.timeout_secs, 30);
        assert!((settings.llm.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.session.ttl(), Duration::from_secs(1800));
    }
}
