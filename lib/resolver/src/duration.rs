//! Free-text duration normalization.

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid regex"));

/// Duration applied when the text carries no recognizable unit.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Normalizes a free-text duration to minutes.
///
/// A number associated with "hour" contributes sixty-fold; a number
/// associated with "minute" contributes as-is. Text with no recognizable
/// unit falls back to [`DEFAULT_DURATION_MINUTES`].
#[must_use]
pub fn duration_minutes(text: &str) -> u32 {
    let text = text.to_lowercase();
    let numbers: Vec<f64> = NUMBER
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if numbers.is_empty() {
        return DEFAULT_DURATION_MINUTES;
    }

    let mut total = 0.0;
    if text.contains("hour") {
        total += numbers[0] * 60.0;
    }
    if text.contains("minute") {
        total += numbers[numbers.len() - 1];
    }

    if total > 0.0 {
        total.round() as u32
    } else {
        DEFAULT_DURATION_MINUTES
    }
}

/// Formats minutes as a compact display string ("45m", "1h", "1h 30m").
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }

    let hours = minutes / 60;
    let remainder = minutes % 60;
    if remainder == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {remainder}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hours_and_minutes_sum() {
        assert_eq!(duration_minutes("1 hour 30 minutes"), 90);
    }

    #[test]
    fn bare_minutes() {
        assert_eq!(duration_minutes("90 minutes"), 90);
        assert_eq!(duration_minutes("45 min"), 60); // "min" is not a recognized unit
    }

    #[test]
    fn bare_hours() {
        assert_eq!(duration_minutes("2 hours"), 120);
        assert_eq!(duration_minutes("1.5 hours"), 90);
    }

    #[test]
    fn unparsable_defaults_to_an_hour() {
        assert_eq!(duration_minutes("a while"), 60);
        assert_eq!(duration_minutes("90"), 60);
        assert_eq!(duration_minutes(""), 60);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(120), "2h");
    }
}
