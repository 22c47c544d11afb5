//! Slot schema configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slot schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlotsConfig {
    /// Slot definitions keyed by slot name
    #[serde(default)]
    pub slots: HashMap<String, SlotDefinition>,
}

impl SlotsConfig {
    pub fn get(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.get(name)
    }

    /// The standard HR domain slots, compiled in. Questions are bilingual
    /// (Hindi + English) to match the assistant's user base.
    pub fn standard_hr() -> Self {
        let mut slots = HashMap::new();

        slots.insert(
            "leave_type".to_string(),
            SlotDefinition {
                slot_type: SlotType::String,
                description: "Type of leave".to_string(),
                question: Some(
                    "किस प्रकार की छुट्टी चाहिए? What type of leave? (Sick, Casual, Earned)"
                        .to_string(),
                ),
            },
        );
        slots.insert(
            "from_date".to_string(),
            SlotDefinition {
                slot_type: SlotType::Date,
                description: "Leave start date".to_string(),
                question: Some("किस तारीख से छुट्टी चाहिए? From which date?".to_string()),
            },
        );
        slots.insert(
            "to_date".to_string(),
            SlotDefinition {
                slot_type: SlotType::Date,
                description: "Leave end date".to_string(),
                question: Some("किस तारीख तक? Until which date?".to_string()),
            },
        );
        slots.insert(
            "reason".to_string(),
            SlotDefinition {
                slot_type: SlotType::String,
                description: "Reason for the request".to_string(),
                question: Some("कारण बताएं? What is the reason?".to_string()),
            },
        );
        slots.insert(
            "date".to_string(),
            SlotDefinition {
                slot_type: SlotType::Date,
                description: "Date of the request".to_string(),
                question: Some("किस तारीख के लिए? For which date?".to_string()),
            },
        );
        slots.insert(
            "from_time".to_string(),
            SlotDefinition {
                slot_type: SlotType::Time,
                description: "Start time".to_string(),
                question: Some(
                    "किस समय से किस समय तक? What time range? (e.g., 9am to 6pm)".to_string(),
                ),
            },
        );
        slots.insert(
            "to_time".to_string(),
            SlotDefinition {
                slot_type: SlotType::Time,
                description: "End time".to_string(),
                question: Some(
                    "किस समय से किस समय तक? What time range? (e.g., 9am to 6pm)".to_string(),
                ),
            },
        );
        slots.insert(
            "action".to_string(),
            SlotDefinition {
                slot_type: SlotType::String,
                description: "Attendance action".to_string(),
                question: Some("क्या करना है? Check-in or check-out?".to_string()),
            },
        );
        slots.insert(
            "location".to_string(),
            SlotDefinition {
                slot_type: SlotType::String,
                description: "Attendance location".to_string(),
                question: None,
            },
        );
        slots.insert(
            "month".to_string(),
            SlotDefinition {
                slot_type: SlotType::Number,
                description: "Salary slip month".to_string(),
                question: None,
            },
        );
        slots.insert(
            "year".to_string(),
            SlotDefinition {
                slot_type: SlotType::Number,
                description: "Salary slip year".to_string(),
                question: None,
            },
        );

        Self { slots }
    }
}

/// Definition for a single slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Slot type
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Bilingual clarifying question asked when this slot is the first
    /// missing one
    #[serde(default)]
    pub question: Option<String>,
}

/// Slot type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    String,
    Number,
    Date,
    Time,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_hr_slots() {
        let config = SlotsConfig::standard_hr();
        assert_eq!(config.get("from_date").unwrap().slot_type, SlotType::Date);
        assert_eq!(config.get("from_time").unwrap().slot_type, SlotType::Time);
        assert!(config.get("reason").unwrap().question.is_some());
        assert!(config.get("no_such_slot").is_none());
    }

    #[test]
    fn test_slot_yaml_shape() {
        let yaml = r#"
slots:
  from_date:
    type: date
    description: "Leave start date"
    question: "From which date?"
"#;
        let config: SlotsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.get("from_date").unwrap().slot_type, SlotType::Date);
    }
}
