//! Readiness and validation policy
//!
//! Per intent, a static ordered required-field list drives which single
//! clarifying question to ask next, and full validation once every field is
//! present: date sanity checks and duration-based approval gating. A leave
//! of exactly the auto threshold executes without approval; one day more
//! requires it. Regularization older than the staleness threshold escalates
//! to approval rather than being rejected.

use crate::request::{ActionRequest, FieldError};
use hr_agent_config::{ApprovalRule, DomainConfig};
use hr_agent_core::{Clock, Intent, SlotMap};
use std::sync::Arc;

/// Outcome of validating the merged slot set for an intent
#[derive(Debug, Clone)]
pub enum PolicyDecision {
    /// Required fields are still missing; ask exactly one question
    Incomplete {
        missing: Vec<String>,
        question: String,
    },
    /// A field is present but unusable; recoverable, slots preserved
    Invalid { field: String, message: String },
    /// Ready to route: execute directly or submit for approval
    Approved {
        request: ActionRequest,
        requires_approval: bool,
    },
}

/// Per-intent validation and approval policy
pub struct ValidationPolicy {
    domain: Arc<DomainConfig>,
    clock: Arc<dyn Clock>,
}

impl ValidationPolicy {
    pub fn new(domain: Arc<DomainConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { domain, clock }
    }

    /// Validate the merged slots for an intent.
    ///
    /// `extraction_question` is the question the extractor proposed; it wins
    /// over the configured one when present so mid-flow phrasing stays
    /// consistent.
    pub fn validate(
        &self,
        intent: Intent,
        slots: &SlotMap,
        extraction_question: Option<&str>,
    ) -> PolicyDecision {
        let required = self.domain.required_slots(intent);
        let missing: Vec<String> = required
            .iter()
            .filter(|slot| !slots.contains_key(*slot))
            .cloned()
            .collect();

        if let Some(first_missing) = missing.first() {
            let question = extraction_question
                .map(|q| q.to_string())
                .unwrap_or_else(|| self.domain.question_for(first_missing));
            return PolicyDecision::Incomplete { missing, question };
        }

        let request = match ActionRequest::from_slots(intent, slots) {
            Ok(request) => request,
            Err(FieldError { field, message }) => {
                return PolicyDecision::Invalid {
                    field: field.to_string(),
                    message,
                }
            }
        };

        let rule = self
            .domain
            .intent(intent)
            .map(|d| d.approval.clone())
            .unwrap_or_default();

        match self.check_dates(&request, &rule) {
            Ok(requires_approval) => {
                tracing::debug!(
                    intent = %intent,
                    requires_approval,
                    "Validation passed"
                );
                PolicyDecision::Approved {
                    request,
                    requires_approval: requires_approval || rule.always,
                }
            }
            Err((field, message)) => {
                tracing::debug!(intent = %intent, field = %field, "Validation rejected");
                PolicyDecision::Invalid {
                    field: field.to_string(),
                    message,
                }
            }
        }
    }

    /// Date sanity checks plus the numeric approval rules. Returns whether
    /// the numeric rules demand approval.
    fn check_dates(
        &self,
        request: &ActionRequest,
        rule: &ApprovalRule,
    ) -> Result<bool, (&'static str, String)> {
        let today = self.clock.today();

        match request {
            ActionRequest::Leave(leave) => {
                if leave.from_date < today {
                    return Err((
                        "from_date",
                        "Cannot apply leave for past dates. किस तारीख से छुट्टी चाहिए?".to_string(),
                    ));
                }
                if leave.to_date < leave.from_date {
                    return Err(("to_date", "End date is before the start date".to_string()));
                }
                let over_threshold = rule
                    .max_auto_days
                    .is_some_and(|threshold| leave.duration_days() > threshold);
                Ok(over_threshold)
            }
            ActionRequest::Regularization(reg) => {
                if reg.date > today {
                    return Err(("date", "Cannot regularize future dates".to_string()));
                }
                if reg.to_time <= reg.from_time {
                    return Err(("to_time", "End time must be after the start time".to_string()));
                }
                let stale = rule
                    .stale_after_days
                    .is_some_and(|threshold| (today - reg.date).num_days() > threshold);
                Ok(stale)
            }
            ActionRequest::OnDuty(onduty) => {
                if onduty.date < today {
                    return Err(("date", "Cannot apply on-duty for past dates".to_string()));
                }
                if onduty.to_time <= onduty.from_time {
                    return Err(("to_time", "End time must be after the start time".to_string()));
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}
