//! Free-text time parsing.
//!
//! Strategies in fixed precedence: spelled-out periods ("6 in the
//! morning"), the period-phrase table, explicit clock formats, am/pm
//! shorthand, then bare digit runs.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

static SPOKEN_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*(?:o'clock)?\s*(?:in the\s*)?(morning|afternoon|evening)")
        .expect("valid regex")
});

static AM_PM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*(am|pm)").expect("valid regex"));

/// Period phrases to clock times, longest phrase first so "early
/// morning" is not shadowed by "morning".
const PERIOD_PHRASES: [(&str, (u32, u32)); 12] = [
    ("early morning", (7, 0)),
    ("late morning", (11, 0)),
    ("early afternoon", (13, 0)),
    ("late afternoon", (16, 0)),
    ("early evening", (17, 0)),
    ("late evening", (20, 0)),
    ("morning", (9, 0)),
    ("afternoon", (14, 0)),
    ("evening", (18, 0)),
    ("midnight", (0, 0)),
    ("night", (21, 0)),
    ("noon", (12, 0)),
];

/// Explicit clock formats, in precedence order. chrono refuses to parse
/// a time without a minute, so hour-only inputs are handled by the
/// digit-run and am/pm stages instead.
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H.%M", "%I:%M %p", "%I:%M%p"];

/// Parses a free-text time of day.
///
/// Returns `None` when no strategy matches.
#[must_use]
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim().to_lowercase();

    if let Some(time) = parse_spoken_period(&text) {
        return Some(time);
    }
    if let Some(time) = parse_period_phrase(&text) {
        return Some(time);
    }
    if let Some(time) = parse_clock_format(&text) {
        return Some(time);
    }
    if let Some(time) = parse_am_pm(&text) {
        return Some(time);
    }
    parse_digit_run(&text)
}

fn parse_spoken_period(text: &str) -> Option<NaiveTime> {
    let captures = SPOKEN_PERIOD.captures(text)?;
    let mut hour: u32 = captures[1].parse().ok()?;
    let period = &captures[2];

    if (period == "afternoon" || period == "evening") && hour < 12 {
        hour += 12;
    }

    NaiveTime::from_hms_opt(hour, 0, 0)
}

fn parse_period_phrase(text: &str) -> Option<NaiveTime> {
    let (_, (hour, minute)) = PERIOD_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))?;
    NaiveTime::from_hms_opt(*hour, *minute, 0)
}

fn parse_clock_format(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

fn parse_am_pm(text: &str) -> Option<NaiveTime> {
    let captures = AM_PM.captures(text)?;
    let mut hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = captures
        .get(2)
        .map_or(Some(0), |m| m.as_str().parse().ok())?;

    match &captures[3] {
        "pm" if hour != 12 => hour += 12,
        "am" if hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_digit_run(text: &str) -> Option<NaiveTime> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hour, minute) = match text.len() {
        // "14" reads as a bare 24-hour hour.
        1 | 2 => (text.parse().ok()?, 0),
        // "930" reads as 9:30.
        3 => (text[..1].parse().ok()?, text[1..].parse().ok()?),
        // "1430" reads as 14:30.
        4 => (text[..2].parse().ok()?, text[2..].parse().ok()?),
        _ => return None,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}
