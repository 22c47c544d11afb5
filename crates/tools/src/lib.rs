//! Action executor boundary
//!
//! The engine never talks to the HR back end directly; it invokes named
//! tools through the `ToolExecutor` trait and gets a `{status, ...payload}`
//! result back. Timeouts and structurally malformed responses become errors,
//! never panics. Adapters provided here:
//! - `ToolRegistry`: in-process tools with per-tool timeout enforcement
//! - `HttpActionExecutor`: remote executor speaking `{toolName, arguments}`
//! - `simulated`: an in-process HR back end for tests and offline runs

pub mod contract;
pub mod http;
pub mod registry;
pub mod simulated;

pub use contract::{Tool, ToolError, ToolOutput, ToolParameter, ToolSchema, ToolStatus};
pub use http::HttpActionExecutor;
pub use registry::{ToolExecutor, ToolRegistry};
pub use simulated::{simulated_registry, SimulatedHrmsState};

impl From<ToolError> for hr_agent_core::Error {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Timeout { .. } => hr_agent_core::Error::Timeout,
            other => hr_agent_core::Error::Execution(other.to_string()),
        }
    }
}
