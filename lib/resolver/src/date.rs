//! Free-text date parsing.
//!
//! Strategies are tried in fixed precedence; the first success wins:
//! literal keywords, named weekdays, relative phrases, absolute formats,
//! then ordinal day-of-month.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use std::sync::LazyLock;

static ORDINAL_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})(st|nd|rd|th)").expect("valid regex"));

/// Full weekday names first, then their abbreviations.
const WEEKDAYS: [(&str, Weekday); 14] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("mon", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("sun", Weekday::Sun),
];

/// Absolute formats with an explicit year, in precedence order.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Year-omitted formats; the reference year is appended before parsing.
const YEARLESS_FORMATS: [&str; 4] = ["%B %d", "%b %d", "%d %B", "%d %b"];

/// Parses a free-text date relative to `today`.
///
/// Returns `None` when no strategy matches.
#[must_use]
pub fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();

    if let Some(date) = parse_literal(&text, today) {
        return Some(date);
    }
    if let Some(date) = parse_weekday(&text, today) {
        return Some(date);
    }
    if let Some(date) = parse_relative(&text, today) {
        return Some(date);
    }
    if let Some(date) = parse_absolute(&text, today) {
        return Some(date);
    }
    parse_ordinal(&text, today)
}

fn parse_literal(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    match text {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "day after tomorrow" => today.checked_add_days(Days::new(2)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    }
}

fn parse_weekday(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    // Whole-word match only; "mon" inside "month" is not a weekday.
    let contains_word = |name: &str| {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == name)
    };
    let (_, target) = WEEKDAYS.iter().find(|(name, _)| contains_word(name))?;

    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut offset = wanted - current;

    if text.contains("next") {
        // "next Sunday" on a Sunday means a week out, never today.
        if offset <= 0 {
            offset += 7;
        }
    } else if offset < 0 {
        // Already happened this week; the bare weekday rolls forward.
        // The same weekday as today resolves to today.
        offset += 7;
    }

    today.checked_add_days(Days::new(offset as u64))
}

fn parse_relative(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if text.contains("next week") {
        return today.checked_add_days(Days::new(7));
    }
    if text.contains("next month") {
        // Fixed-day approximation, not calendar-month aware.
        return today.checked_add_days(Days::new(30));
    }
    None
}

fn parse_absolute(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    let with_year = format!("{text} {}", today.year());
    for fmt in YEARLESS_FORMATS {
        let fmt_with_year = format!("{fmt} %Y");
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, &fmt_with_year) {
            return Some(date);
        }
    }

    None
}

fn parse_ordinal(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let captures = ORDINAL_DAY.captures(text)?;
    let day: u32 = captures[1].parse().ok()?;

    let in_this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), day)?;
    if in_this_month >= today {
        return Some(in_this_month);
    }

    // Already passed this month; roll to the next one.
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
