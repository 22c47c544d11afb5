//! Tool contract types

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Default timeout for tool execution (30 seconds)
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool {tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invocation failed: {0}")]
    Invocation(String),
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        ToolError::NotFound(name.into())
    }

    pub fn timeout(tool: impl Into<String>, secs: u64) -> Self {
        ToolError::Timeout {
            tool: tool.into(),
            secs,
        }
    }
}

/// Execution status reported by the back end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Success,
    Error,
}

/// Result of one tool invocation: a status plus the remaining payload fields.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ToolStatus,
    /// Human-readable message, usually present on errors
    pub message: Option<String>,
    /// Remaining response fields
    pub payload: serde_json::Map<String, Value>,
}

impl ToolOutput {
    pub fn success(payload: serde_json::Map<String, Value>) -> Self {
        Self {
            status: ToolStatus::Success,
            message: None,
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            message: Some(message.into()),
            payload: serde_json::Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Interpret an arbitrary JSON value as a tool result. Anything that is
    /// not an object carrying a recognizable `status` is treated as an error
    /// rather than trusted.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::error("malformed executor response: not an object");
        };

        let status = map
            .remove("status")
            .and_then(|v| v.as_str().map(|s| s.to_string()));
        let message = map
            .remove("message")
            .and_then(|v| v.as_str().map(|s| s.to_string()));

        match status.as_deref() {
            Some("success") => Self {
                status: ToolStatus::Success,
                message,
                payload: map,
            },
            Some("error") => Self {
                status: ToolStatus::Error,
                message: message.or_else(|| Some("unknown error".to_string())),
                payload: map,
            },
            _ => Self::error("malformed executor response: missing status"),
        }
    }
}

/// Declared shape of a tool
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

/// One declared tool parameter
#[derive(Debug, Clone)]
pub struct ToolParameter {
    pub name: String,
    pub required: bool,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, required: bool) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            required,
        });
        self
    }

    /// Check required parameters are present in the arguments object
    pub fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        let object = arguments
            .as_object()
            .ok_or_else(|| ToolError::InvalidArguments("arguments must be an object".to_string()))?;

        for param in self.parameters.iter().filter(|p| p.required) {
            if !object.contains_key(&param.name) {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required argument '{}'",
                    param.name
                )));
            }
        }
        Ok(())
    }
}

/// An invocable tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    /// Per-tool execution timeout
    fn timeout_secs(&self) -> u64 {
        DEFAULT_TOOL_TIMEOUT_SECS
    }

    /// Validate arguments before execution
    fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        self.schema().validate(arguments)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError>;
}
