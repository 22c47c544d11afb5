//! Extraction prompt builder

use crate::extraction::ExtractionRequest;
use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the structured-extraction prompt.
///
/// The model is asked for a single fixed-shape JSON object. Prior slot values
/// and the current date are inlined so multi-turn continuations and relative
/// dates resolve correctly. Reference leave-type names constrain the
/// `leave_type` field to valid values.
pub fn build_extraction_prompt(request: &ExtractionRequest) -> Vec<Message> {
    let prior = if request.prior_slots.is_empty() {
        String::new()
    } else {
        format!(
            "\nPrevious conversation data: {}",
            hr_agent_core::slots::summarize(&request.prior_slots)
        )
    };

    let leave_types = if request.reference_leave_types.is_empty() {
        "none available".to_string()
    } else {
        request.reference_leave_types.join(", ")
    };

    let user = format!(
        r#"Message: "{utterance}"{prior}
Today: {today}
Leave types: {leave_types}

Identify the intent and extract every field present in the message. Handle typos, Hindi/English mix, and shortcuts (SL/CL/EL).

Intents: apply_leave, mark_attendance, apply_regularization, apply_onduty, check_leave_balance, get_holidays, get_salary_slip, policy_question. A message about on duty / WFH is always apply_onduty; forgot-to-punch is apply_regularization.

Fields by intent:
- apply_leave: leave_type (exact name from the list), from_date, to_date (YYYY-MM-DD), reason
- apply_regularization / apply_onduty: date (YYYY-MM-DD), from_time, to_time (HH:MM 24-hour), reason
- mark_attendance: action (check_in or check_out), location
- get_salary_slip: month (1-12), year

Reply with ONLY this JSON object:
{{"intent": "...", "confidence": 0.0, "extracted_data": {{}}, "missing_fields": [], "next_question": null, "ready_to_execute": false}}

Examples:
"apply sick leave 4 nov health issues" -> {{"intent":"apply_leave","confidence":0.95,"extracted_data":{{"leave_type":"Sick Leave","from_date":"{year}-11-04","to_date":"{year}-11-04","reason":"health issues"}},"missing_fields":[],"next_question":null,"ready_to_execute":true}}
"on duty for today 9am to 6pm" -> {{"intent":"apply_onduty","confidence":0.95,"extracted_data":{{"date":"{today}","from_time":"09:00","to_time":"18:00"}},"missing_fields":["reason"],"next_question":"Reason?","ready_to_execute":false}}
"punch in" -> {{"intent":"mark_attendance","confidence":0.9,"extracted_data":{{"action":"check_in"}},"missing_fields":[],"next_question":null,"ready_to_execute":true}}

Do not ask for information already present in the message or the previous conversation data."#,
        utterance = request.utterance,
        prior = prior,
        today = request.current_date,
        year = request.current_date.format("%Y"),
        leave_types = leave_types,
    );

    vec![
        Message::system("Extract HR intent and data as JSON."),
        Message::user(user),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hr_agent_core::SlotMap;

    #[test]
    fn test_prompt_carries_context() {
        let mut prior = SlotMap::new();
        prior.insert("from_date".to_string(), "2025-11-22".to_string());

        let request = ExtractionRequest {
            utterance: "sick".to_string(),
            prior_slots: prior,
            current_date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
            reference_leave_types: vec!["Sick Leave".to_string()],
        };

        let messages = build_extraction_prompt(&request);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        let body = &messages[1].content;
        assert!(body.contains("from_date=2025-11-22"));
        assert!(body.contains("2025-11-10"));
        assert!(body.contains("Sick Leave"));
    }
}
