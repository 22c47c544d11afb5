//! Closed intent enumeration
//!
//! Intents are a closed tagged union rather than free-form strings so that
//! dispatch tables get compile-time exhaustiveness checking. Wire names
//! (snake_case) match the session record and extraction contract.

use serde::{Deserialize, Serialize};

/// What the user wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Apply for leave (richer workflow with balance check)
    ApplyLeave,
    /// Mark attendance (check-in / check-out)
    MarkAttendance,
    /// Regularize a missed attendance punch
    ApplyRegularization,
    /// Apply for on-duty (WFH, client site, field work)
    #[serde(rename = "apply_onduty")]
    ApplyOnDuty,
    /// Query remaining leave balance
    CheckLeaveBalance,
    /// Query upcoming holidays
    GetHolidays,
    /// Fetch a salary slip document
    GetSalarySlip,
    /// HR policy question, answered by the external knowledge layer
    PolicyQuestion,
    /// Not yet resolved
    #[default]
    Unknown,
}

impl Intent {
    /// Wire name used in session records and the extraction contract
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ApplyLeave => "apply_leave",
            Intent::MarkAttendance => "mark_attendance",
            Intent::ApplyRegularization => "apply_regularization",
            Intent::ApplyOnDuty => "apply_onduty",
            Intent::CheckLeaveBalance => "check_leave_balance",
            Intent::GetHolidays => "get_holidays",
            Intent::GetSalarySlip => "get_salary_slip",
            Intent::PolicyQuestion => "policy_question",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse a wire name; anything unrecognized maps to `Unknown`
    pub fn parse(name: &str) -> Self {
        match name {
            "apply_leave" => Intent::ApplyLeave,
            "mark_attendance" => Intent::MarkAttendance,
            "apply_regularization" => Intent::ApplyRegularization,
            "apply_onduty" => Intent::ApplyOnDuty,
            "check_leave_balance" => Intent::CheckLeaveBalance,
            "get_holidays" => Intent::GetHolidays,
            "get_salary_slip" => Intent::GetSalarySlip,
            "policy_question" => Intent::PolicyQuestion,
            _ => Intent::Unknown,
        }
    }

    /// In-flow intents are force-selected by the prefilter while their
    /// conversation is active, regardless of new keywords. This prevents
    /// intent drift mid-dialogue (e.g. a time range like "9am to 6pm"
    /// matching nothing, or a reason text matching another intent).
    pub fn is_in_flow(&self) -> bool {
        matches!(self, Intent::ApplyOnDuty | Intent::ApplyRegularization)
    }

    /// Intents whose required fields include a from/to time range, eligible
    /// for the deterministic regex backstop.
    pub fn requires_time_range(&self) -> bool {
        matches!(self, Intent::ApplyOnDuty | Intent::ApplyRegularization)
    }

    /// Intents resolvable from keywords alone, with no slot collection.
    pub fn is_simple_query(&self) -> bool {
        matches!(self, Intent::CheckLeaveBalance | Intent::GetHolidays)
    }

    /// All resolvable intents, in prefilter priority order (first match wins).
    pub fn prefilter_order() -> &'static [Intent] {
        &[
            Intent::ApplyOnDuty,
            Intent::ApplyRegularization,
            Intent::GetHolidays,
            Intent::CheckLeaveBalance,
            Intent::GetSalarySlip,
            Intent::PolicyQuestion,
            Intent::MarkAttendance,
            Intent::ApplyLeave,
        ]
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip() {
        for intent in Intent::prefilter_order() {
            assert_eq!(Intent::parse(intent.as_str()), *intent);
        }
        assert_eq!(Intent::parse("something else"), Intent::Unknown);
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        let json = serde_json::to_string(&Intent::ApplyOnDuty).unwrap();
        assert_eq!(json, "\"apply_onduty\"");
        let parsed: Intent = serde_json::from_str("\"apply_leave\"").unwrap();
        assert_eq!(parsed, Intent::ApplyLeave);
    }

    #[test]
    fn test_in_flow_intents() {
        assert!(Intent::ApplyOnDuty.is_in_flow());
        assert!(Intent::ApplyRegularization.is_in_flow());
        assert!(!Intent::ApplyLeave.is_in_flow());
    }
}
