//! Deterministic natural-language date/time resolution.
//!
//! This crate provides:
//!
//! - **Date parsing**: relative keywords, weekdays, absolute formats,
//!   and ordinal days, tried in fixed precedence
//! - **Time parsing**: period phrases, clock formats, am/pm shorthand
//! - **Duration**: free-text duration to minutes, with display formatting
//!
//! Every function takes its reference instant as a parameter and never
//! reads the clock, so identical inputs always resolve identically.

pub mod date;
pub mod duration;
pub mod time;

pub use date::parse_date;
pub use duration::{duration_minutes, format_minutes, DEFAULT_DURATION_MINUTES};
pub use time::parse_time;

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Resolves free-text date and time into an absolute instant in the
/// given timezone.
///
/// An instant earlier than `now` on a non-today date is logged as an
/// anomaly but still returned; the calendar collaborator decides what to
/// do with it.
#[must_use]
pub fn resolve_datetime(
    date_text: &str,
    time_text: &str,
    now: DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    let date = parse_date(date_text, now.date_naive())?;
    let time = parse_time(time_text)?;

    let resolved = NaiveDateTime::new(date, time)
        .and_local_timezone(*now.offset())
        .single()?;

    if resolved < now && date != now.date_naive() {
        tracing::warn!(%resolved, %now, "resolved datetime is in the past");
    }

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    #[test]
    fn combines_date_and_time_in_reference_offset() {
        let now = at(2024, 6, 10, 9, 0);
        let resolved = resolve_datetime("tomorrow", "3pm", now).expect("resolves");

        assert_eq!(resolved.date_naive().to_string(), "2024-06-11");
        assert_eq!(resolved.time().to_string(), "15:00:00");
        assert_eq!(resolved.offset(), now.offset());
    }

    #[test]
    fn past_instant_on_non_today_date_still_resolves() {
        let now = at(2024, 6, 10, 9, 0);
        let resolved = resolve_datetime("2024-01-05", "10:00", now);
        assert!(resolved.is_some());
    }

    #[test]
    fn unparsable_date_yields_none() {
        let now = at(2024, 6, 10, 9, 0);
        assert!(resolve_datetime("whenever", "3pm", now).is_none());
        assert!(resolve_datetime("tomorrow", "sometime", now).is_none());
    }
}
