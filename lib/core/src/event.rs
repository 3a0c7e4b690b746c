//! Stored records of created calendar events.

use crate::edit::EventUpdates;
use crate::key::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event previously created through the dialogue, kept so the
/// user can refer back to it when requesting edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Identifier assigned by the calendar collaborator.
    pub event_id: EventId,
    /// Event title.
    pub title: String,
    /// Event date as displayed to the user.
    pub date: String,
    /// Event time as displayed to the user.
    pub time: String,
    /// Duration display string.
    pub duration: String,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// Link into the user's calendar, if the collaborator returned one.
    pub calendar_url: Option<String>,
}

impl StoredEvent {
    /// Applies derived edit updates to the stored copy.
    pub fn apply(&mut self, updates: &EventUpdates) {
        if let Some(title) = &updates.title {
            self.title = title.clone();
        }
        if let Some(date) = &updates.date {
            self.date = date.clone();
        }
        if let Some(time) = &updates.time {
            self.time = time.clone();
        }
        if let Some(duration) = &updates.duration {
            self.duration = duration.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredEvent {
        StoredEvent {
            event_id: EventId::new("evt_1"),
            title: "Team sync".to_string(),
            date: "Friday".to_string(),
            time: "2pm".to_string(),
            duration: "1h".to_string(),
            created_at: Utc::now(),
            calendar_url: None,
        }
    }

    #[test]
    fn apply_updates_changed_fields_only() {
        let mut event = sample();
        event.apply(&EventUpdates {
            time: Some("4pm".to_string()),
            ..Default::default()
        });

        assert_eq!(event.time, "4pm");
        assert_eq!(event.title, "Team sync");
        assert_eq!(event.date, "Friday");
    }
}
