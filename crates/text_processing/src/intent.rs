//! Keyword-based intent prefilter
//!
//! A fixed, ordered table of (intent, trigger keywords) scanned first-match-
//! wins. This runs before the model call so critical intents are caught even
//! when the model is down or wrong, and its ordering resolves keyword overlap
//! ("leave balance" hits the balance entry before the leave entry).

use hr_agent_config::DomainConfig;
use hr_agent_core::Intent;

/// Keyword intent detector built from the domain's trigger table
pub struct KeywordIntentDetector {
    table: Vec<(Intent, Vec<String>)>,
}

impl KeywordIntentDetector {
    /// Build from domain configuration; keywords are lowercased once here.
    pub fn from_domain(domain: &DomainConfig) -> Self {
        let table = domain
            .trigger_table()
            .into_iter()
            .map(|(intent, keywords)| {
                (
                    intent,
                    keywords.iter().map(|k| k.to_lowercase()).collect(),
                )
            })
            .collect();
        Self { table }
    }

    /// Scan the utterance against the table; first match wins.
    pub fn detect(&self, utterance: &str) -> Option<Intent> {
        let lower = utterance.to_lowercase();
        for (intent, keywords) in &self.table {
            if keywords.iter().any(|k| lower.contains(k.as_str())) {
                tracing::debug!(intent = %intent, "Prefilter matched intent");
                return Some(*intent);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> KeywordIntentDetector {
        KeywordIntentDetector::from_domain(&DomainConfig::default())
    }

    #[test]
    fn test_onduty_beats_leave() {
        let d = detector();
        assert_eq!(d.detect("apply on duty for today"), Some(Intent::ApplyOnDuty));
        assert_eq!(d.detect("I will WFH tomorrow"), Some(Intent::ApplyOnDuty));
    }

    #[test]
    fn test_balance_beats_leave() {
        let d = detector();
        assert_eq!(
            d.detect("what is my leave balance"),
            Some(Intent::CheckLeaveBalance)
        );
        assert_eq!(d.detect("apply sick leave"), Some(Intent::ApplyLeave));
    }

    #[test]
    fn test_regularization_beats_attendance() {
        let d = detector();
        assert_eq!(
            d.detect("attendance correction for monday"),
            Some(Intent::ApplyRegularization)
        );
        assert_eq!(
            d.detect("forgot to punch yesterday"),
            Some(Intent::ApplyRegularization)
        );
        assert_eq!(d.detect("punch in"), Some(Intent::MarkAttendance));
    }

    #[test]
    fn test_salary_and_holidays() {
        let d = detector();
        assert_eq!(d.detect("salary slip for october"), Some(Intent::GetSalarySlip));
        assert_eq!(d.detect("upcoming holidays"), Some(Intent::GetHolidays));
    }

    #[test]
    fn test_no_keywords_is_none() {
        let d = detector();
        assert_eq!(d.detect("not feeling well"), None);
        assert_eq!(d.detect("6 nov"), None);
    }
}
