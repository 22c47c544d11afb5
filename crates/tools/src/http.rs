//! HTTP adapter for a remote action executor
//!
//! Speaks the narrow wire contract `{toolName, arguments}` and interprets
//! whatever comes back through `ToolOutput::from_value`, so a misbehaving
//! back end degrades to an error result instead of a crash.

use crate::contract::{ToolError, ToolOutput, ToolSchema};
use crate::registry::ToolExecutor;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Remote action executor configuration
#[derive(Debug, Clone)]
pub struct HttpExecutorConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081/tools".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    #[serde(rename = "toolName")]
    tool_name: &'a str,
    arguments: Value,
}

/// Action executor over HTTP
pub struct HttpActionExecutor {
    client: Client,
    config: HttpExecutorConfig,
    /// Declared tool surface, used only for discovery
    schemas: Vec<ToolSchema>,
}

impl HttpActionExecutor {
    pub fn new(config: HttpExecutorConfig, schemas: Vec<ToolSchema>) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ToolError::Invocation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            schemas,
        })
    }
}

#[async_trait]
impl ToolExecutor for HttpActionExecutor {
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let request = InvokeRequest {
            tool_name: name,
            arguments,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::timeout(name, self.config.timeout.as_secs())
                } else {
                    ToolError::Invocation(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ToolError::Invocation(format!(
                "executor returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::Invocation(format!("unreadable executor response: {}", e)))?;

        Ok(ToolOutput::from_value(body))
    }

    fn list_tools(&self) -> Vec<ToolSchema> {
        self.schemas.clone()
    }

    fn get_tool(&self, name: &str) -> Option<ToolSchema> {
        self.schemas.iter().find(|s| s.name == name).cloned()
    }
}
