//! Slot map and the merge reducer
//!
//! Slots accumulate across turns of a conversation. The merge reducer is a
//! pure key-wise union with new values overriding old ones; it never drops a
//! previously known key. Keeping it pure makes idempotence testable and lets
//! the session store apply it atomically under its per-key lock.

use std::collections::BTreeMap;

/// Named fields collected for the current intent.
///
/// Values are canonical strings: dates `YYYY-MM-DD`, times `HH:MM` (24-hour),
/// months `1..=12`, years `YYYY`. A `BTreeMap` keeps iteration (and therefore
/// logging and prompt summaries) deterministic.
pub type SlotMap = BTreeMap<String, String>;

/// Well-known slot keys. Keys are intent-specific and not schema-enforced
/// across intents; these constants just keep call sites typo-free.
pub mod keys {
    pub const LEAVE_TYPE: &str = "leave_type";
    pub const FROM_DATE: &str = "from_date";
    pub const TO_DATE: &str = "to_date";
    pub const REASON: &str = "reason";
    pub const DATE: &str = "date";
    pub const FROM_TIME: &str = "from_time";
    pub const TO_TIME: &str = "to_time";
    pub const ACTION: &str = "action";
    pub const LOCATION: &str = "location";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
}

/// Combine previously stored slots with newly extracted ones.
///
/// New values override old ones key-wise; keys absent from `new` keep their
/// prior values. Empty or whitespace-only new values are ignored so a partial
/// extraction can never erase information the user already supplied.
pub fn merge(prior: &SlotMap, new: &SlotMap) -> SlotMap {
    let mut merged = prior.clone();
    for (key, value) in new {
        if value.trim().is_empty() {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Build a compact `key=value` summary for prompts and logs.
pub fn summarize(slots: &SlotMap) -> String {
    slots
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(pairs: &[(&str, &str)]) -> SlotMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_union_with_override() {
        let prior = slots(&[("from_date", "2025-11-22"), ("leave_type", "Sick Leave")]);
        let new = slots(&[("reason", "fever"), ("leave_type", "Casual Leave")]);

        let merged = merge(&prior, &new);
        assert_eq!(merged.get("from_date").unwrap(), "2025-11-22");
        assert_eq!(merged.get("leave_type").unwrap(), "Casual Leave");
        assert_eq!(merged.get("reason").unwrap(), "fever");
    }

    #[test]
    fn test_merge_idempotence() {
        let s = slots(&[("from_date", "2025-11-22")]);
        let s2 = slots(&[("leave_type", "Sick Leave"), ("reason", "fever")]);

        let once = merge(&s, &s2);
        let twice = merge(&s, &merge(&s, &s2));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_non_destructive() {
        let s = slots(&[("from_date", "2025-11-22"), ("reason", "fever")]);
        let s2 = slots(&[("leave_type", "Sick Leave")]);

        let merged = merge(&s, &s2);
        for (k, v) in &s {
            if !s2.contains_key(k) {
                assert_eq!(merged.get(k), Some(v));
            }
        }
    }

    #[test]
    fn test_merge_ignores_empty_values() {
        let prior = slots(&[("reason", "fever")]);
        let new = slots(&[("reason", "  "), ("leave_type", "")]);

        let merged = merge(&prior, &new);
        assert_eq!(merged.get("reason").unwrap(), "fever");
        assert!(!merged.contains_key("leave_type"));
    }

    #[test]
    fn test_merge_empty_new_is_identity() {
        let prior = slots(&[("from_date", "2025-11-22")]);
        assert_eq!(merge(&prior, &SlotMap::new()), prior);
    }
}
