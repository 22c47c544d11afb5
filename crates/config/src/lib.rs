//! Configuration management for the HR conversation engine
//!
//! Supports loading configuration from:
//! - YAML/TOML files
//! - Environment variables (HR_AGENT_ prefix)
//!
//! Domain-specific configuration (intents, slots, approval rules) lives in a
//! separate YAML document loaded via `DomainConfig`. Compiled-in defaults
//! cover the standard HR domain so tests and local runs need no files.

pub mod domain;
pub mod settings;

pub use domain::{
    ApprovalRule, DomainConfig, IntentDefinition, IntentsConfig, SlotDefinition, SlotType,
    SlotsConfig,
};
pub use settings::{
    load_settings, ExecutorSettings, LlmSettings, RuntimeEnvironment, SessionSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for hr_agent_core::Error {
    fn from(err: ConfigError) -> Self {
        hr_agent_core::Error::Configuration(err.to_string())
    }
}
