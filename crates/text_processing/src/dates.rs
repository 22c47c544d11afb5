//! Date resolution
//!
//! Handles the date forms users actually type: canonical `YYYY-MM-DD`,
//! day + month name with or without a year ("6 nov", "nov 6 2025"),
//! numeric `D/M` or `D/M/YYYY`, and the relative words "today"/"tomorrow".
//!
//! A date given without a year resolves to the nearest future occurrence of
//! that month/day: if it has already passed this year, it rolls to next year.

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)\.?(?:\s+(\d{4}))?\b")
        .expect("day-month pattern is valid")
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s+(\d{4}))?\b")
        .expect("month-day pattern is valid")
});

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}))?\b").expect("numeric date pattern is valid")
});

static ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("iso date pattern is valid"));

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let months = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    months
        .iter()
        .position(|m| m.starts_with(&name) && name.len() >= 3)
        .map(|i| i as u32 + 1)
}

/// Direction a year-less month/day resolves towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearAnchor {
    /// Nearest future occurrence (leave, on-duty)
    Future,
    /// Nearest past occurrence (regularization of a missed punch)
    Past,
}

fn nearest(day: u32, month: u32, today: NaiveDate, anchor: YearAnchor) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match (anchor, this_year) {
        (YearAnchor::Future, Some(date)) if date >= today => Some(date),
        (YearAnchor::Future, _) => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
        (YearAnchor::Past, Some(date)) if date <= today => Some(date),
        (YearAnchor::Past, _) => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
    }
}

/// Resolve the first date mentioned in the text.
///
/// Explicit years are honored as-is; a missing year rolls forward to the
/// nearest future occurrence.
pub fn resolve_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    resolve_with_anchor(text, today, YearAnchor::Future)
}

/// Like [`resolve_date`], but a missing year resolves to the nearest past
/// occurrence. Used for requests about something that already happened.
pub fn resolve_past_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    resolve_with_anchor(text, today, YearAnchor::Past)
}

fn resolve_with_anchor(text: &str, today: NaiveDate, anchor: YearAnchor) -> Option<NaiveDate> {
    let lower = text.to_lowercase();

    if lower.contains("today") {
        return Some(today);
    }
    if lower.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }
    if lower.contains("yesterday") {
        return Some(today - Duration::days(1));
    }

    if let Some(caps) = ISO.captures(text) {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let day: u32 = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for caps in DAY_MONTH.captures_iter(text) {
        let (Some(day), Some(word)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if let (Some(month), Ok(day)) = (month_number(word.as_str()), day.as_str().parse()) {
            return match caps.get(3) {
                Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
                None => nearest(day, month, today, anchor),
            };
        }
    }

    for caps in MONTH_DAY.captures_iter(text) {
        let (Some(word), Some(day)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if let (Some(month), Ok(day)) = (month_number(word.as_str()), day.as_str().parse()) {
            return match caps.get(3) {
                Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
                None => nearest(day, month, today, anchor),
            };
        }
    }

    if let Some(caps) = NUMERIC.captures(text) {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        return match caps.get(3) {
            Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
            None => nearest(day, month, today, anchor),
        };
    }

    None
}

/// Resolve the (month, year) a salary-slip request refers to.
///
/// "last month"/"previous month" means the month before `today`; an explicit
/// month name is honored (with the current year unless stated); anything else
/// defaults to the current month.
pub fn resolve_salary_period(text: &str, today: NaiveDate) -> (u32, i32) {
    let lower = text.to_lowercase();

    let last_month_phrases = ["last month", "previous month", "last mnth", "prev month"];
    if last_month_phrases.iter().any(|p| lower.contains(p)) {
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        return (month, year);
    }

    static YEAR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("year pattern is valid"));

    for word in lower.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if let Some(month) = month_number(word) {
            let year = YEAR
                .captures(&lower)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or_else(|| today.year());
            return (month, year);
        }
    }

    (today.month(), today.year())
}
