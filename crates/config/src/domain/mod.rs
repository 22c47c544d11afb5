//! Domain configuration
//!
//! All HR-domain knowledge (which intents exist, which slots they need and in
//! what order, which keywords trigger them, and their approval rules) is
//! config-driven rather than hardcoded. `DomainConfig::default()` carries the
//! compiled-in standard HR domain; `DomainConfig::load` reads the same shape
//! from a YAML file.

mod intents;
mod slots;

pub use intents::{ApprovalRule, IntentDefinition, IntentsConfig};
pub use slots::{SlotDefinition, SlotType, SlotsConfig};

use crate::ConfigError;
use hr_agent_core::Intent;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master domain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default)]
    pub intents: IntentsConfig,
    #[serde(default)]
    pub slots: SlotsConfig,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            intents: IntentsConfig::standard_hr(),
            slots: SlotsConfig::standard_hr(),
        }
    }
}

impl DomainConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e)))?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency: every slot an intent requires must be
    /// defined, and every intent name must be a known wire name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for def in &self.intents.intents {
            if Intent::parse(&def.name) == Intent::Unknown && def.name != "unknown" {
                return Err(ConfigError::InvalidValue {
                    field: "intents.name".to_string(),
                    message: format!("unrecognized intent '{}'", def.name),
                });
            }
            for slot in &def.required_slots {
                if self.slots.get(slot).is_none() {
                    return Err(ConfigError::MissingField(format!(
                        "slot '{}' required by intent '{}'",
                        slot, def.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Definition for an intent, if configured
    pub fn intent(&self, intent: Intent) -> Option<&IntentDefinition> {
        self.intents.get(intent.as_str())
    }

    /// Ordered required slots for an intent (empty when unconfigured)
    pub fn required_slots(&self, intent: Intent) -> &[String] {
        self.intent(intent)
            .map(|d| d.required_slots.as_slice())
            .unwrap_or(&[])
    }

    /// Clarifying question for a slot, falling back to a generic prompt
    pub fn question_for(&self, slot: &str) -> String {
        if let Some(def) = self.slots.get(slot) {
            if let Some(ref question) = def.question {
                return question.clone();
            }
        }
        format!("Please provide your {}.", slot.replace('_', " "))
    }

    /// The ordered (intent, keywords) trigger table for the prefilter.
    /// Declaration order in the config is the priority order.
    pub fn trigger_table(&self) -> Vec<(Intent, &[String])> {
        self.intents
            .intents
            .iter()
            .map(|d| (Intent::parse(&d.name), d.trigger_keywords.as_slice()))
            .filter(|(intent, _)| *intent != Intent::Unknown)
            .collect()
    }
}
