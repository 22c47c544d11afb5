//! Simulated HR back end
//!
//! In-process stand-in for the external HRMS, used by tests and offline
//! runs. Mutations are recorded so tests can assert on what was submitted;
//! failures can be injected per tool to exercise error paths.

use crate::contract::{Tool, ToolError, ToolOutput, ToolSchema};
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared state behind the simulated back end
pub struct SimulatedHrmsState {
    leave_types: Vec<String>,
    balances: Mutex<HashMap<String, f64>>,
    applied: Mutex<Vec<(String, Value)>>,
    fail_with: Mutex<HashMap<String, String>>,
}

impl SimulatedHrmsState {
    pub fn new() -> Self {
        let mut balances = HashMap::new();
        balances.insert("Sick Leave".to_string(), 6.0);
        balances.insert("Casual Leave".to_string(), 2.0);
        balances.insert("Earned Leave".to_string(), 10.0);

        Self {
            leave_types: vec![
                "Sick Leave".to_string(),
                "Casual Leave".to_string(),
                "Earned Leave".to_string(),
            ],
            balances: Mutex::new(balances),
            applied: Mutex::new(Vec::new()),
            fail_with: Mutex::new(HashMap::new()),
        }
    }

    /// Override the balance for one leave type
    pub fn set_balance(&self, leave_type: &str, days: f64) {
        self.balances.lock().insert(leave_type.to_string(), days);
    }

    /// Make one tool fail with the given message until cleared
    pub fn fail_tool(&self, tool: &str, message: &str) {
        self.fail_with
            .lock()
            .insert(tool.to_string(), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_with.lock().clear();
    }

    /// Calls recorded so far, as (tool name, arguments)
    pub fn applied(&self) -> Vec<(String, Value)> {
        self.applied.lock().clone()
    }

    fn record(&self, tool: &str, arguments: &Value) {
        self.applied
            .lock()
            .push((tool.to_string(), arguments.clone()));
    }

    fn injected_failure(&self, tool: &str) -> Option<String> {
        self.fail_with.lock().get(tool).cloned()
    }
}

impl Default for SimulatedHrmsState {
    fn default() -> Self {
        Self::new()
    }
}

/// One simulated HRMS tool
struct SimulatedTool {
    name: &'static str,
    description: &'static str,
    state: Arc<SimulatedHrmsState>,
}

#[async_trait]
impl Tool for SimulatedTool {
    fn name(&self) -> &str {
        self.name
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name, self.description).with_param("user_id", true)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        if let Some(message) = self.state.injected_failure(self.name) {
            return Ok(ToolOutput::from_value(json!({
                "status": "error",
                "message": message,
            })));
        }

        self.state.record(self.name, &arguments);

        let response = match self.name {
            "get_leave_types" => json!({
                "status": "success",
                "leave_types": self.state.leave_types.iter()
                    .map(|name| json!({"name": name}))
                    .collect::<Vec<_>>(),
            }),
            "get_leave_balance" => {
                let balances = self.state.balances.lock();
                json!({
                    "status": "success",
                    "balances": balances.iter()
                        .map(|(leave_type, days)| json!({"leave_type": leave_type, "days": days}))
                        .collect::<Vec<_>>(),
                })
            }
            "apply_leave" => {
                let days = leave_days(&arguments).unwrap_or(1);
                json!({"status": "success", "days_requested": days})
            }
            "apply_onduty" | "apply_regularization" | "mark_attendance" => {
                json!({"status": "success"})
            }
            "get_holidays" => json!({
                "status": "success",
                "holidays": [
                    {"name": "Diwali", "date": "2025-10-20"},
                    {"name": "Christmas", "date": "2025-12-25"},
                ],
            }),
            "get_salary_slip" => {
                let month = arguments.get("month").and_then(|v| v.as_i64()).unwrap_or(1);
                let year = arguments.get("year").and_then(|v| v.as_i64()).unwrap_or(2025);
                json!({
                    "status": "success",
                    "month": month,
                    "year": year,
                    "document": {"reference": format!("payslip-{}-{:02}.pdf", year, month)},
                })
            }
            other => return Err(ToolError::not_found(other)),
        };

        Ok(ToolOutput::from_value(response))
    }
}

fn leave_days(arguments: &Value) -> Option<i64> {
    let from = arguments.get("from_date")?.as_str()?;
    let to = arguments.get("to_date")?.as_str()?;
    let from = chrono::NaiveDate::parse_from_str(from, "%Y-%m-%d").ok()?;
    let to = chrono::NaiveDate::parse_from_str(to, "%Y-%m-%d").ok()?;
    Some((to - from).num_days() + 1)
}

const SIMULATED_TOOLS: &[(&str, &str)] = &[
    ("get_leave_types", "List valid leave types"),
    ("get_leave_balance", "Query remaining leave balances"),
    ("apply_leave", "Submit a leave application"),
    ("apply_onduty", "Submit an on-duty application"),
    ("apply_regularization", "Submit an attendance regularization"),
    ("mark_attendance", "Record a check-in or check-out"),
    ("get_holidays", "List upcoming holidays"),
    ("get_salary_slip", "Fetch a salary slip document"),
];

/// Build a registry backed by the simulated HR back end
pub fn simulated_registry(state: Arc<SimulatedHrmsState>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for &(name, description) in SIMULATED_TOOLS {
        registry.register(SimulatedTool {
            name,
            description,
            state: state.clone(),
        });
    }
    registry
}
