//! Conversation orchestration engine
//!
//! Ties the layers together: session persistence, layered intent/slot
//! extraction, slot merging, per-intent validation and approval policy, and
//! the workflow graphs that route a resolved intent through validation,
//! approval gating, execution, and response shaping.
//!
//! ```text
//! utterance ──▶ SessionStore (load prior state)
//!           ──▶ IntentExtractor (prefilter → model → deterministic backstops)
//!           ──▶ merge into session (atomic per key)
//!           ──▶ WorkflowGraph per intent family
//!                  validate → [balance check] → approval gate → execute
//!           ──▶ TurnReply { response, session_id, document? }
//! ```
//!
//! Every failure is converted to a user-facing message at the turn boundary;
//! nothing propagates as an unhandled fault to the caller.

pub mod dst;
pub mod engine;
pub mod policy;
pub mod request;
pub mod responses;
pub mod workflow;

pub use dst::{ExtractionResult, IntentExtractor};
pub use engine::{ConversationEngine, TurnOutcome, TurnReply};
pub use policy::{PolicyDecision, ValidationPolicy};
pub use request::{
    ActionRequest, AttendanceAction, AttendanceRequest, LeaveRequest, OnDutyRequest,
    RegularizationRequest, SalarySlipRequest,
};
pub use workflow::{WorkflowContext, WorkflowGraph, WorkflowNode, WorkflowState};

use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<hr_agent_session::SessionError> for EngineError {
    fn from(err: hr_agent_session::SessionError) -> Self {
        EngineError::Session(err.to_string())
    }
}

impl From<hr_agent_llm::LlmError> for EngineError {
    fn from(err: hr_agent_llm::LlmError) -> Self {
        EngineError::Extraction(err.to_string())
    }
}

impl From<hr_agent_tools::ToolError> for EngineError {
    fn from(err: hr_agent_tools::ToolError) -> Self {
        EngineError::Tool(err.to_string())
    }
}

impl From<hr_agent_config::ConfigError> for EngineError {
    fn from(err: hr_agent_config::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}
