//! Structured extraction contract
//!
//! One extraction request goes out per turn; the model must return a fixed-
//! shape JSON object. Output is parsed defensively: code fences are stripped,
//! the object is located inside surrounding prose, unknown fields are
//! ignored, and numbers are normalized to canonical slot strings. Anything
//! unparseable is an `InvalidResponse` error so the caller can engage the
//! deterministic fallback path.

use crate::backend::LlmBackend;
use crate::prompt::build_extraction_prompt;
use crate::LlmError;
use async_trait::async_trait;
use chrono::NaiveDate;
use hr_agent_core::SlotMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Input to one extraction pass
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    /// Raw user utterance
    pub utterance: String,
    /// Previously accumulated slots, as context
    pub prior_slots: SlotMap,
    /// Current date, for relative-date resolution
    pub current_date: NaiveDate,
    /// Valid leave-type names from reference data
    pub reference_leave_types: Vec<String>,
}

/// Fixed-shape model output. Every field is defaulted so a structurally
/// partial response still parses; the advisory fields are sanity-checked by
/// the caller rather than trusted.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModelExtraction {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub extracted_data: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default)]
    pub ready_to_execute: bool,
}

impl ModelExtraction {
    /// Normalize `extracted_data` into canonical slot strings: nulls and
    /// empty strings are dropped, numbers are rendered without a decimal
    /// point where integral.
    pub fn slot_values(&self) -> SlotMap {
        let mut slots = SlotMap::new();
        for (key, value) in &self.extracted_data {
            let text = match value {
                serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        i.to_string()
                    } else {
                        n.to_string()
                    }
                }
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            slots.insert(key.clone(), text);
        }
        slots
    }
}

/// Contract the engine requires from the model provider
#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ModelExtraction, LlmError>;
}

/// Extractor backed by an `LlmBackend`
pub struct LlmExtractor {
    backend: Arc<dyn LlmBackend>,
}

impl LlmExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl StructuredExtractor for LlmExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ModelExtraction, LlmError> {
        let messages = build_extraction_prompt(request);
        let result = self.backend.generate(&messages).await?;

        let extraction = parse_model_json(&result.text)?;
        tracing::debug!(
            intent = %extraction.intent,
            confidence = extraction.confidence,
            fields = extraction.extracted_data.len(),
            latency_ms = result.total_time_ms,
            "Model extraction parsed"
        );
        Ok(extraction)
    }
}

/// Parse a model response into a `ModelExtraction`, tolerating code fences
/// and prose around the JSON object.
pub fn parse_model_json(text: &str) -> Result<ModelExtraction, LlmError> {
    let trimmed = text.trim();

    if let Ok(parsed) = serde_json::from_str::<ModelExtraction>(trimmed) {
        return Ok(parsed);
    }

    // Look for the outermost object in fenced or prose-wrapped output
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(parsed) = serde_json::from_str::<ModelExtraction>(&trimmed[start..=end]) {
                return Ok(parsed);
            }
        }
    }

    Err(LlmError::InvalidResponse(format!(
        "not a valid extraction object: {}",
        truncate(trimmed, 120)
    )))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
