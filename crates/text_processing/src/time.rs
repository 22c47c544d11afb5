//! Time-range parsing
//!
//! Recognizes ranges like "9am to 6pm", "9:30am till 6:30pm" and
//! "09:00-18:00" and normalizes them to 24-hour `HH:MM` pairs. Noon and
//! midnight are handled explicitly: 12pm stays 12:00, 12am becomes 00:00.

use once_cell::sync::Lazy;
use regex::Regex;

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d{1,2}):?(\d{2})?\s*(am|pm)?\s*(?:to|till|-)\s*(\d{1,2}):?(\d{2})?\s*(am|pm)?",
    )
    .expect("time range pattern is valid")
});

/// Parse the first time range in the text, returning canonical
/// (`from`, `to`) as `HH:MM` 24-hour strings.
pub fn parse_time_range(text: &str) -> Option<(String, String)> {
    for caps in TIME_RANGE.captures_iter(text) {
        if let Some(range) = range_from_captures(text, &caps) {
            return Some(range);
        }
    }
    None
}

fn range_from_captures(text: &str, caps: &regex::Captures<'_>) -> Option<(String, String)> {
    // Skip matches that are really fragments of a date: digits, '-' or '/'
    // adjacent to the match, e.g. the "25-11" inside 2025-11-06.
    let whole = caps.get(0)?;
    let before = text[..whole.start()].chars().next_back();
    let after = text[whole.end()..].chars().next();
    let date_like = |c: char| c.is_ascii_digit() || c == '-' || c == '/';
    if before.is_some_and(date_like) || after.is_some_and(date_like) {
        return None;
    }

    let from = normalize(
        caps.get(1)?.as_str(),
        caps.get(2).map(|m| m.as_str()),
        caps.get(3).map(|m| m.as_str()),
    )?;
    let to = normalize(
        caps.get(4)?.as_str(),
        caps.get(5).map(|m| m.as_str()),
        caps.get(6).map(|m| m.as_str()),
    )?;

    Some((from, to))
}

fn normalize(hour: &str, minute: Option<&str>, period: Option<&str>) -> Option<String> {
    let mut hour: u32 = hour.parse().ok()?;
    let minute = minute.unwrap_or("00");

    match period.map(|p| p.to_lowercase()).as_deref() {
        Some("pm") if hour != 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    if hour > 23 || minute.parse::<u32>().ok()? > 59 {
        return None;
    }

    Some(format!("{:02}:{}", hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_am_pm_range() {
        assert_eq!(
            parse_time_range("9am to 6pm"),
            Some(("09:00".to_string(), "18:00".to_string()))
        );
    }

    #[test]
    fn test_midnight() {
        assert_eq!(
            parse_time_range("12am to 1pm"),
            Some(("00:00".to_string(), "13:00".to_string()))
        );
    }

    #[test]
    fn test_noon() {
        assert_eq!(
            parse_time_range("12pm to 6pm"),
            Some(("12:00".to_string(), "18:00".to_string()))
        );
    }

    #[test]
    fn test_minutes_and_till() {
        assert_eq!(
            parse_time_range("was in office 9:30am till 6:30pm"),
            Some(("09:30".to_string(), "18:30".to_string()))
        );
    }

    #[test]
    fn test_24h_dash() {
        assert_eq!(
            parse_time_range("09:00-18:00"),
            Some(("09:00".to_string(), "18:00".to_string()))
        );
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_time_range("not feeling well"), None);
        assert_eq!(parse_time_range("9am"), None);
    }

    #[test]
    fn test_date_fragments_are_not_times() {
        assert_eq!(parse_time_range("2025-11-06"), None);
        assert_eq!(
            parse_time_range("regularize 2025-11-06 9am to 6pm"),
            Some(("09:00".to_string(), "18:00".to_string()))
        );
    }
}
