//! Stand-in collaborators for missing or misconfigured backends.
//!
//! The dialogue path stays up when a collaborator cannot be built;
//! these stand-ins fail every call so the engine degrades to its
//! apology replies.

use async_trait::async_trait;
use copper_almanac_ai::{LanguageModel, LlmError, QueryAnalysis, RecentEventSummary, TaskAnalysis};
use copper_almanac_core::{
    EditIntent, EventId, EventUpdates, ExtractedFields, TaskData, UserKey,
};
use copper_almanac_integration::{Calendar, CalendarError, CreatedEvent, Messenger};

fn llm_unavailable() -> LlmError {
    LlmError::Unavailable {
        reason: "language model not configured".to_string(),
    }
}

fn calendar_unavailable() -> CalendarError {
    CalendarError::Unavailable {
        reason: "calendar not configured".to_string(),
    }
}

pub struct UnavailableModel;

#[async_trait]
impl LanguageModel for UnavailableModel {
    async fn analyze_task(&self, _message: &str) -> Result<TaskAnalysis, LlmError> {
        Err(llm_unavailable())
    }

    async fn analyze_edit(
        &self,
        _message: &str,
        _recent_events: &[RecentEventSummary],
    ) -> Result<EditIntent, LlmError> {
        Err(llm_unavailable())
    }

    async fn analyze_query(&self, _message: &str) -> Result<QueryAnalysis, LlmError> {
        Err(llm_unavailable())
    }

    async fn parse_reply(
        &self,
        _message: &str,
        _context: &str,
    ) -> Result<ExtractedFields, LlmError> {
        Err(llm_unavailable())
    }

    async fn parse_confirmation_edit(
        &self,
        _message: &str,
        _task: &TaskData,
    ) -> Result<ExtractedFields, LlmError> {
        Err(llm_unavailable())
    }
}

pub struct UnavailableCalendar;

#[async_trait]
impl Calendar for UnavailableCalendar {
    async fn create_event(&self, _task: &TaskData) -> Result<CreatedEvent, CalendarError> {
        Err(calendar_unavailable())
    }

    async fn update_event(
        &self,
        _event_id: &EventId,
        _updates: &EventUpdates,
    ) -> Result<Option<String>, CalendarError> {
        Err(calendar_unavailable())
    }

    async fn list_events(&self, _date_range: &str) -> Result<String, CalendarError> {
        Err(calendar_unavailable())
    }
}

pub struct UnavailableMessenger;

#[async_trait]
impl Messenger for UnavailableMessenger {
    async fn send_message(&self, to: &UserKey, _body: &str) -> bool {
        tracing::error!(%to, "dropping outbound message, messaging not configured");
        false
    }
}
