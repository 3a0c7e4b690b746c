//! The calendar collaborator contract.

use crate::error::CalendarError;
use async_trait::async_trait;
use copper_almanac_core::{EventId, EventUpdates, TaskData};

/// The identity and link of a newly created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub event_id: EventId,
    /// Browser link to the event, when the backend provides one.
    pub url: Option<String>,
}

/// Scheduling operations the dialogue engine depends on.
///
/// Errors never reach users as-is; the caller maps them to apology
/// replies.
#[async_trait]
pub trait Calendar: Send + Sync {
    /// Creates an event from a completed task.
    async fn create_event(&self, task: &TaskData) -> Result<CreatedEvent, CalendarError>;

    /// Applies an update patch to an existing event, returning the
    /// event's browser link when available.
    async fn update_event(
        &self,
        event_id: &EventId,
        updates: &EventUpdates,
    ) -> Result<Option<String>, CalendarError>;

    /// Lists events for a date-range label ("today", "this week", or a
    /// specific day) as user-facing text.
    async fn list_events(&self, date_range: &str) -> Result<String, CalendarError>;
}
