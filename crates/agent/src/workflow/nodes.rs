//! Workflow nodes

use crate::policy::PolicyDecision;
use crate::request::ActionRequest;
use crate::responses;
use crate::workflow::{WorkflowContext, WorkflowNode, WorkflowState};
use crate::EngineError;
use async_trait::async_trait;
use hr_agent_core::ConversationPhase;
use hr_agent_tools::ToolOutput;
use serde_json::json;

/// Run the readiness/validation policy and record the decision.
pub struct ValidateNode;

#[async_trait]
impl WorkflowNode for ValidateNode {
    fn name(&self) -> &'static str {
        "validate"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        state.advance(ConversationPhase::Validating);

        match ctx.policy.validate(
            state.intent,
            &state.slots,
            state.extraction_question.as_deref(),
        ) {
            PolicyDecision::Incomplete { missing, question } => {
                tracing::debug!(missing = ?missing, "Asking for next field");
                state.incomplete = true;
                state.response = Some(question);
                state.advance(ConversationPhase::Collecting);
            }
            PolicyDecision::Invalid { field, message } => {
                tracing::debug!(field = %field, "Recoverable validation failure");
                state.invalid = true;
                state.response = Some(responses::validation_error(&message));
                state.advance(ConversationPhase::Collecting);
            }
            PolicyDecision::Approved {
                request,
                requires_approval,
            } => {
                state.request = Some(request);
                state.requires_approval = requires_approval;
            }
        }
        Ok(())
    }
}

/// Fetch the leave balance and compare against the requested duration.
pub struct CheckBalanceNode;

#[async_trait]
impl WorkflowNode for CheckBalanceNode {
    fn name(&self) -> &'static str {
        "check_balance"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        let Some(ActionRequest::Leave(leave)) = state.request.clone() else {
            // Nothing to check for non-leave requests
            return Ok(());
        };

        let output = ctx
            .executor
            .execute("get_leave_balance", json!({"user_id": state.user_id}))
            .await;

        let balance = match output {
            Ok(output) if output.is_success() => balance_for(&output, &leave.leave_type),
            Ok(output) => {
                tracing::warn!(message = ?output.message, "Balance query returned error");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Balance query failed");
                None
            }
        };

        let required = leave.duration_days() as f64;
        state.balance = balance;
        state.sufficient_balance = balance.is_some_and(|days| days >= required);

        tracing::debug!(
            balance = ?state.balance,
            required,
            sufficient = state.sufficient_balance,
            "Balance checked"
        );
        Ok(())
    }
}

fn balance_for(output: &ToolOutput, leave_type: &str) -> Option<f64> {
    output.get("balances")?.as_array()?.iter().find_map(|entry| {
        let name = entry.get("leave_type")?.as_str()?;
        if name == leave_type {
            entry.get("days")?.as_f64()
        } else {
            None
        }
    })
}

/// Suggest alternative leave types when balance is insufficient. Stops the
/// flow without executing; slots stay intact so the user can switch type.
pub struct SuggestAlternativesNode;

#[async_trait]
impl WorkflowNode for SuggestAlternativesNode {
    fn name(&self) -> &'static str {
        "suggest_alternatives"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        _ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        let Some(ActionRequest::Leave(leave)) = state.request.clone() else {
            return Ok(());
        };

        let alternatives: Vec<String> = state
            .leave_types
            .iter()
            .filter(|t| **t != leave.leave_type)
            .cloned()
            .collect();

        state.response = Some(responses::insufficient_balance(
            &leave.leave_type,
            state.balance.unwrap_or(0.0),
            &alternatives,
        ));
        state.advance(ConversationPhase::Collecting);
        Ok(())
    }
}

/// Route between auto-execution and pending-approval submission.
pub struct ApprovalGateNode;

#[async_trait]
impl WorkflowNode for ApprovalGateNode {
    fn name(&self) -> &'static str {
        "approval_gate"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        _ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        let target = if state.requires_approval {
            ConversationPhase::PendingApproval
        } else {
            ConversationPhase::AutoExecute
        };
        state.advance(target);
        tracing::debug!(phase = %state.phase, "Approval gate");
        Ok(())
    }
}

/// Invoke the action executor and shape the outcome.
///
/// Executor failures leave the session intact so the user can correct and
/// retry without re-entering everything.
pub struct ExecuteNode;

#[async_trait]
impl WorkflowNode for ExecuteNode {
    fn name(&self) -> &'static str {
        "execute"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        let Some(request) = state.request.clone() else {
            return Err(EngineError::Workflow(
                "execute reached without a validated request".to_string(),
            ));
        };

        let mut arguments = request.arguments(&state.user_id);
        if state.requires_approval {
            arguments["requires_approval"] = json!(true);
        }

        let result = ctx.executor.execute(request.tool_name(), arguments).await;

        match result {
            Ok(output) if output.is_success() => {
                state.document = output.get("document").cloned();
                state.response = Some(success_response(&request, state, &output));
                state.advance(ConversationPhase::Executed);
                state.clear_session = true;
                tracing::info!(tool = request.tool_name(), "Action executed");
            }
            Ok(output) => {
                let message = output
                    .message
                    .unwrap_or_else(|| "unknown executor error".to_string());
                tracing::warn!(tool = request.tool_name(), error = %message, "Executor error");
                state.execution_error = Some(message.clone());
                state.response = Some(responses::execution_failed(&message));
                state.advance(ConversationPhase::Failed);
            }
            Err(err) => {
                tracing::warn!(tool = request.tool_name(), error = %err, "Executor call failed");
                state.execution_error = Some(err.to_string());
                state.response = Some(responses::execution_failed(&err.to_string()));
                state.advance(ConversationPhase::Failed);
            }
        }
        Ok(())
    }
}

fn success_response(request: &ActionRequest, state: &WorkflowState, output: &ToolOutput) -> String {
    match request {
        ActionRequest::Leave(leave) => {
            let days = output
                .get("days_requested")
                .and_then(|v| v.as_i64())
                .unwrap_or_else(|| leave.duration_days());
            if state.requires_approval {
                responses::leave_pending_approval(leave, days)
            } else {
                responses::leave_success(leave, days)
            }
        }
        ActionRequest::OnDuty(onduty) => responses::onduty_success(onduty),
        ActionRequest::Regularization(reg) => {
            responses::regularization_success(reg, state.requires_approval)
        }
        ActionRequest::Attendance(att) => {
            responses::attendance_success(att.action.as_str(), att.location.as_deref())
        }
        ActionRequest::SalarySlip(slip) => responses::salary_slip_ready(slip.month, slip.year),
        ActionRequest::BalanceQuery => {
            let balances: Vec<(String, f64)> = output
                .get("balances")
                .and_then(|v| v.as_array())
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            let name = entry.get("leave_type")?.as_str()?.to_string();
                            let days = entry.get("days")?.as_f64()?;
                            Some((name, days))
                        })
                        .collect()
                })
                .unwrap_or_default();
            responses::balance_summary(&balances)
        }
        ActionRequest::HolidayQuery => {
            let holidays: Vec<(String, String)> = output
                .get("holidays")
                .and_then(|v| v.as_array())
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            let name = entry.get("name")?.as_str()?.to_string();
                            let date = entry.get("date")?.as_str()?.to_string();
                            Some((name, date))
                        })
                        .collect()
                })
                .unwrap_or_default();
            responses::holidays_summary(&holidays)
        }
    }
}

/// Terminal node: make sure a response exists.
pub struct RespondNode;

#[async_trait]
impl WorkflowNode for RespondNode {
    fn name(&self) -> &'static str {
        "respond"
    }

    async fn run(
        &self,
        state: &mut WorkflowState,
        _ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        if state.response.is_none() {
            state.response = Some(responses::fallback());
        }
        Ok(())
    }
}
