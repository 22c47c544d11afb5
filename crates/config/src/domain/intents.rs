//! Intent configuration
//!
//! Each intent carries its ordered required slots (the order drives which
//! clarifying question is asked next), the keyword triggers used by the
//! deterministic prefilter, and the approval rule applied after validation.

use serde::{Deserialize, Serialize};

/// Intents configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsConfig {
    /// Intent definitions; declaration order is prefilter priority order
    #[serde(default)]
    pub intents: Vec<IntentDefinition>,
    /// Minimum model confidence to accept a classified intent
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

fn default_min_confidence() -> f32 {
    0.3
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            intents: Vec::new(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl IntentsConfig {
    /// Get an intent definition by wire name
    pub fn get(&self, name: &str) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.name == name)
    }

    /// The standard HR domain, compiled in
    pub fn standard_hr() -> Self {
        let intents = vec![
            IntentDefinition {
                name: "apply_onduty".to_string(),
                description: "Apply for on-duty (WFH, client site, field work)".to_string(),
                required_slots: str_vec(&["date", "from_time", "to_time", "reason"]),
                trigger_keywords: str_vec(&[
                    "on duty",
                    "onduty",
                    "on-duty",
                    "wfh",
                    "work from home",
                    "field work",
                    "client site",
                ]),
                approval: ApprovalRule {
                    always: true,
                    ..ApprovalRule::default()
                },
            },
            IntentDefinition {
                name: "apply_regularization".to_string(),
                description: "Regularize a missed attendance punch".to_string(),
                required_slots: str_vec(&["date", "from_time", "to_time", "reason"]),
                trigger_keywords: str_vec(&[
                    "regularize",
                    "regularization",
                    "forgot to punch",
                    "missed punch",
                    "forgot punch",
                    "attendance correction",
                ]),
                approval: ApprovalRule {
                    stale_after_days: Some(3),
                    ..ApprovalRule::default()
                },
            },
            IntentDefinition {
                name: "get_holidays".to_string(),
                description: "List upcoming holidays".to_string(),
                required_slots: Vec::new(),
                trigger_keywords: str_vec(&[
                    "holiday",
                    "holidays",
                    "upcoming holiday",
                    "chutti list",
                    "festival",
                ]),
                approval: ApprovalRule::default(),
            },
            IntentDefinition {
                name: "check_leave_balance".to_string(),
                description: "Query remaining leave balance".to_string(),
                required_slots: Vec::new(),
                trigger_keywords: str_vec(&["leave balance", "balance", "remaining leave"]),
                approval: ApprovalRule::default(),
            },
            IntentDefinition {
                name: "get_salary_slip".to_string(),
                description: "Fetch a salary slip document".to_string(),
                required_slots: Vec::new(),
                trigger_keywords: str_vec(&[
                    "salary slip",
                    "pay slip",
                    "payslip",
                    "salary",
                    "वेतन",
                ]),
                approval: ApprovalRule::default(),
            },
            // Before the leave entry: "leave policy" must hit this, not apply_leave
            IntentDefinition {
                name: "policy_question".to_string(),
                description: "HR policy question (delegated to knowledge layer)".to_string(),
                required_slots: Vec::new(),
                trigger_keywords: str_vec(&["policy", "rule"]),
                approval: ApprovalRule::default(),
            },
            IntentDefinition {
                name: "mark_attendance".to_string(),
                description: "Mark attendance (check-in / check-out)".to_string(),
                required_slots: str_vec(&["action"]),
                trigger_keywords: str_vec(&[
                    "punch",
                    "check in",
                    "check-in",
                    "checkin",
                    "check out",
                    "check-out",
                    "checkout",
                    "attendance",
                ]),
                approval: ApprovalRule::default(),
            },
            IntentDefinition {
                name: "apply_leave".to_string(),
                description: "Apply for leave".to_string(),
                required_slots: str_vec(&["leave_type", "from_date", "reason"]),
                trigger_keywords: str_vec(&["apply leave", "leave", "chutti", "छुट्टी"]),
                approval: ApprovalRule {
                    max_auto_days: Some(3),
                    ..ApprovalRule::default()
                },
            },
        ];

        Self {
            intents,
            min_confidence: default_min_confidence(),
        }
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Single intent definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    /// Wire name, matching `hr_agent_core::Intent`
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Required slots, ordered by question priority
    #[serde(default)]
    pub required_slots: Vec<String>,
    /// Keywords that trigger this intent in the prefilter
    #[serde(default)]
    pub trigger_keywords: Vec<String>,
    /// Approval gating rule
    #[serde(default)]
    pub approval: ApprovalRule,
}

/// Approval gating rule for an intent.
///
/// `always` wins over the numeric rules. `max_auto_days` gates on the
/// requested duration (exactly the threshold still auto-executes);
/// `stale_after_days` gates on how far in the past the request's date lies
/// (escalation rather than rejection).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApprovalRule {
    #[serde(default)]
    pub always: bool,
    #[serde(default)]
    pub max_auto_days: Option<i64>,
    #[serde(default)]
    pub stale_after_days: Option<i64>,
}
