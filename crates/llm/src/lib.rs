//! Model-provider integration
//!
//! The engine only needs one thing from the model: structured extraction of
//! intent and slot values from an utterance plus prior context. This crate
//! provides the backend abstraction (Ollama-style HTTP chat API), the prompt
//! that requests a fixed-shape JSON object, and defensive parsing of the
//! model's output. Everything the model returns is advisory; the caller
//! recomputes readiness deterministically.

pub mod backend;
pub mod extraction;
pub mod prompt;

pub use backend::{GenerationResult, LlmBackend, LlmConfig, OllamaBackend};
pub use extraction::{ExtractionRequest, LlmExtractor, ModelExtraction, StructuredExtractor};
pub use prompt::{build_extraction_prompt, Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for hr_agent_core::Error {
    fn from(err: LlmError) -> Self {
        hr_agent_core::Error::Llm(err.to_string())
    }
}
