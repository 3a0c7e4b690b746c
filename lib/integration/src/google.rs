//! Google Calendar backend.
//!
//! Talks to the Calendar v3 REST surface with a bearer token. Event
//! start instants come from resolving the task's free-text date and
//! time in the configured timezone; durations default to one hour.

use crate::calendar::{Calendar, CreatedEvent};
use crate::error::CalendarError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use copper_almanac_core::{EventId, EventUpdates, TaskData};
use copper_almanac_resolver::{
    duration_minutes, parse_date, resolve_datetime, DEFAULT_DURATION_MINUTES,
};
use serde::Deserialize;
use serde_json::json;
use std::fmt::Write as _;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Configuration for the Google Calendar backend.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCalendarConfig {
    /// Bearer token for the Calendar API.
    pub api_token: String,
    /// Calendar to operate on.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// Base URL of the Calendar v3 API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct EventTime {
    #[serde(rename = "dateTime", default)]
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(rename = "htmlLink", default)]
    html_link: Option<String>,
    #[serde(default)]
    start: Option<EventTime>,
    #[serde(default)]
    end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

/// A `Calendar` backed by the Google Calendar v3 REST API.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    http: reqwest::Client,
    config: GoogleCalendarConfig,
    tz: FixedOffset,
}

impl GoogleCalendar {
    /// Builds the backend for the given configuration and timezone.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is absent or the HTTP client
    /// cannot be constructed.
    pub fn new(
        config: GoogleCalendarConfig,
        tz: FixedOffset,
    ) -> copper_almanac_core::Result<Self, CalendarError> {
        if config.api_token.trim().is_empty() {
            return Err(CalendarError::Unavailable {
                reason: "API token not configured".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CalendarError::Unavailable {
                reason: e.to_string(),
            })?;

        Ok(Self { http, config, tz })
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.tz)
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.config.base_url, self.config.calendar_id
        )
    }

    fn event_url(&self, event_id: &EventId) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }

    fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>, CalendarError> {
        NaiveDateTime::new(date, NaiveTime::MIN)
            .and_local_timezone(self.tz)
            .single()
            .ok_or_else(|| CalendarError::InvalidEvent {
                reason: format!("could not localize {date}"),
            })
    }

    async fn get_event(&self, event_id: &EventId) -> Result<GoogleEvent, CalendarError> {
        let response = self
            .http
            .get(self.event_url(event_id))
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(request_failed)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CalendarError::EventNotFound {
                id: event_id.clone(),
            });
        }
        decode_event(response).await
    }
}

fn request_failed(e: reqwest::Error) -> CalendarError {
    CalendarError::RequestFailed {
        reason: e.to_string(),
    }
}

async fn decode_event(response: reqwest::Response) -> Result<GoogleEvent, CalendarError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CalendarError::RequestFailed {
            reason: format!("status {status}"),
        });
    }
    response.json().await.map_err(request_failed)
}

fn parse_instant(time: Option<&EventTime>, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = time?.date_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(tz))
}

#[async_trait]
impl Calendar for GoogleCalendar {
    async fn create_event(&self, task: &TaskData) -> Result<CreatedEvent, CalendarError> {
        let date = task.date.as_deref().unwrap_or("");
        let time = task.time.as_deref().unwrap_or("");
        let start =
            resolve_datetime(date, time, self.now()).ok_or_else(|| CalendarError::InvalidEvent {
                reason: format!("could not resolve '{date}' at '{time}'"),
            })?;

        let minutes = task
            .duration
            .as_deref()
            .map(duration_minutes)
            .unwrap_or(DEFAULT_DURATION_MINUTES);
        let end = start + Duration::minutes(i64::from(minutes));

        let mut body = json!({
            "summary": task.title.as_deref().unwrap_or("Untitled Task"),
            "description": task.description.as_deref().unwrap_or(""),
            "start": {"dateTime": start.to_rfc3339()},
            "end": {"dateTime": end.to_rfc3339()},
            "reminders": {
                "useDefault": false,
                "overrides": [
                    {"method": "popup", "minutes": 15},
                    {"method": "email", "minutes": 60},
                ],
            },
        });
        if let Some(location) = &task.location {
            body["location"] = json!(location);
        }

        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;
        let event = decode_event(response).await?;

        tracing::info!(event_id = %event.id, "calendar event created");
        Ok(CreatedEvent {
            event_id: EventId::new(event.id),
            url: event.html_link,
        })
    }

    async fn update_event(
        &self,
        event_id: &EventId,
        updates: &EventUpdates,
    ) -> Result<Option<String>, CalendarError> {
        let existing = self.get_event(event_id).await?;
        let existing_start = parse_instant(existing.start.as_ref(), &self.tz);
        let existing_end = parse_instant(existing.end.as_ref(), &self.tz);
        let duration = match (existing_start, existing_end) {
            (Some(start), Some(end)) if end > start => end - start,
            _ => Duration::minutes(i64::from(DEFAULT_DURATION_MINUTES)),
        };

        let mut patch = serde_json::Map::new();
        if let Some(title) = &updates.title {
            patch.insert("summary".to_string(), json!(title));
        }

        // A moved start keeps the event's current duration.
        let mut start = existing_start;
        if (updates.date.is_some() || updates.time.is_some())
            && let Some(current) = existing_start
        {
            let date_text = updates
                .date
                .clone()
                .unwrap_or_else(|| current.format("%Y-%m-%d").to_string());
            let time_text = updates
                .time
                .clone()
                .unwrap_or_else(|| current.format("%H:%M").to_string());
            if let Some(new_start) = resolve_datetime(&date_text, &time_text, self.now()) {
                patch.insert("start".to_string(), json!({"dateTime": new_start.to_rfc3339()}));
                patch.insert(
                    "end".to_string(),
                    json!({"dateTime": (new_start + duration).to_rfc3339()}),
                );
                start = Some(new_start);
            }
        }

        if let Some(duration_text) = &updates.duration
            && let Some(start) = start
        {
            let minutes = duration_minutes(duration_text);
            patch.insert(
                "end".to_string(),
                json!({"dateTime": (start + Duration::minutes(i64::from(minutes))).to_rfc3339()}),
            );
        }

        if patch.is_empty() {
            return Ok(existing.html_link);
        }

        let response = self
            .http
            .patch(self.event_url(event_id))
            .bearer_auth(&self.config.api_token)
            .json(&serde_json::Value::Object(patch))
            .send()
            .await
            .map_err(request_failed)?;
        let updated = decode_event(response).await?;

        tracing::info!(%event_id, "calendar event updated");
        Ok(updated.html_link)
    }

    async fn list_events(&self, date_range: &str) -> Result<String, CalendarError> {
        let today = self.now().date_naive();
        let range = if date_range == "today" {
            Some((today, today))
        } else if date_range == "tomorrow" {
            let tomorrow = today + Duration::days(1);
            Some((tomorrow, tomorrow))
        } else if date_range.contains("week") {
            let mut start =
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            if date_range.contains("next") {
                start += Duration::days(7);
            }
            Some((start, start + Duration::days(6)))
        } else {
            parse_date(date_range, today).map(|day| (day, day))
        };

        let Some((first, last)) = range else {
            return Ok(format!(
                "Sorry, I couldn't understand the date '{date_range}'."
            ));
        };

        let time_min = self.start_of_day(first)?;
        let time_max = self.start_of_day(last + Duration::days(1))? - Duration::seconds(1);

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(&self.config.api_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalendarError::RequestFailed {
                reason: format!("status {status}"),
            });
        }
        let list: EventList = response.json().await.map_err(request_failed)?;

        if list.items.is_empty() {
            return Ok(format!("You have no events scheduled for {date_range}."));
        }

        let mut text = format!("Here are your events for {date_range}:\n\n");
        for event in &list.items {
            let summary = event.summary.as_deref().unwrap_or("(untitled)");
            match parse_instant(event.start.as_ref(), &self.tz) {
                Some(start) => {
                    let _ = writeln!(text, "- *{summary}* at {}", start.format("%I:%M %p"));
                }
                None => {
                    let _ = writeln!(text, "- *{summary}* (all day)");
                }
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> GoogleCalendarConfig {
        GoogleCalendarConfig {
            api_token: token.to_string(),
            calendar_id: default_calendar_id(),
            base_url: default_base_url(),
        }
    }

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn missing_token_is_rejected() {
        assert!(GoogleCalendar::new(config("  "), tz()).is_err());
        assert!(GoogleCalendar::new(config("token"), tz()).is_ok());
    }

    #[test]
    fn instant_parsing_converts_to_configured_timezone() {
        let time = EventTime {
            date_time: Some("2024-06-10T15:00:00+02:00".to_string()),
        };
        let instant = parse_instant(Some(&time), &tz()).expect("parses");
        assert_eq!(instant.time().to_string(), "13:00:00");
    }

    #[test]
    fn absent_instant_yields_none() {
        assert!(parse_instant(None, &tz()).is_none());
        assert!(parse_instant(Some(&EventTime::default()), &tz()).is_none());
    }
}
