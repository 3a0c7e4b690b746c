//! The dialogue engine.
//!
//! One entry point per inbound message. The engine serializes turns per
//! user, applies the rate-limit gate and global commands, then
//! dispatches to the handler for the session's current state. Every
//! path returns reply text; collaborator failures degrade to apologies
//! and never escape as errors.

use crate::edit::EventEditResolver;
use crate::reply;
use chrono::Utc;
use copper_almanac_ai::{LanguageModel, RecentEventSummary, EDIT_CONTEXT_EVENTS};
use copper_almanac_conversation::{
    ConversationState, EventLog, SessionStore, DEFAULT_RECENT_LIMIT,
};
use copper_almanac_core::{
    EditIntent, EventUpdates, RequiredField, StoredEvent, TaskData, UserKey,
};
use copper_almanac_integration::{Calendar, SlidingWindowLimiter};
use std::sync::Arc;

const CANCEL_COMMANDS: [&str; 4] = ["cancel", "stop", "quit", "exit"];
const HELP_COMMANDS: [&str; 3] = ["help", "info", "commands"];
const AFFIRMATIVE: [&str; 7] = ["yes", "y", "confirm", "ok", "correct", "right", "good"];
const NEGATIVE: [&str; 5] = ["no", "n", "cancel", "wrong", "incorrect"];

/// Orchestrates multi-turn task-scheduling conversations.
///
/// Cloning shares sessions, history, and collaborators.
#[derive(Clone)]
pub struct DialogueEngine {
    sessions: SessionStore,
    events: EventLog,
    limiter: SlidingWindowLimiter,
    model: Arc<dyn LanguageModel>,
    calendar: Arc<dyn Calendar>,
}

impl DialogueEngine {
    /// Creates an engine around the given collaborators.
    #[must_use]
    pub fn new(
        model: Arc<dyn LanguageModel>,
        calendar: Arc<dyn Calendar>,
        limiter: SlidingWindowLimiter,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            events: EventLog::new(),
            limiter,
            model,
            calendar,
        }
    }

    /// The session registry, shared with the maintenance loop.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The per-user record of created events.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Evicts sessions idle longer than `max_age_hours`.
    pub fn cleanup_expired_sessions(&self, max_age_hours: f64) -> usize {
        self.sessions.cleanup_expired(max_age_hours)
    }

    /// Turns one inbound message into reply text, advancing the user's
    /// session as a side effect.
    pub async fn handle_inbound_message(&self, user: &UserKey, message: &str) -> String {
        // One turn at a time per user; merges and transitions are not
        // safe under interleaving.
        let turn_lock = self.sessions.turn_lock(user);
        let _turn = turn_lock.lock().await;

        if !self.limiter.check_and_record(user) {
            tracing::warn!(%user, "rate limit exceeded");
            return reply::RATE_LIMITED.to_string();
        }

        let message = message.trim();
        let lowered = message.to_lowercase();
        if CANCEL_COMMANDS.contains(&lowered.as_str()) {
            self.sessions.clear(user);
            return reply::CANCELLED.to_string();
        }
        if HELP_COMMANDS.contains(&lowered.as_str()) {
            return reply::HELP.to_string();
        }

        let session = self.sessions.get_or_create(user);
        tracing::debug!(%user, state = ?session.state, "processing message");

        match session.state {
            ConversationState::Idle => self.handle_idle(user, message).await,
            ConversationState::TaskDetected => self.handle_task_detected(user, message).await,
            ConversationState::AwaitingDate => {
                self.handle_slot_reply(user, RequiredField::Date, message).await
            }
            ConversationState::AwaitingTime => {
                self.handle_slot_reply(user, RequiredField::Time, message).await
            }
            ConversationState::AwaitingDuration => {
                self.handle_awaiting_duration(user, message).await
            }
            ConversationState::Confirming => self.handle_confirming(user, &lowered, message).await,
            ConversationState::SelectingEvent => self.handle_selecting_event(user, message).await,
            ConversationState::Unknown => {
                tracing::warn!(%user, "session in unknown state, resetting");
                self.sessions.clear(user);
                reply::UNKNOWN_STATE.to_string()
            }
        }
    }

    /// Idle dispatch: query intent, then edit intent, then task intent,
    /// then generic help. First positive classification wins.
    async fn handle_idle(&self, user: &UserKey, message: &str) -> String {
        match self.model.analyze_query(message).await {
            Ok(query) if query.is_query => {
                return match self.calendar.list_events(query.range_or_today()).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(%user, error = %e, "event listing failed");
                        reply::CALENDAR_UNAVAILABLE.to_string()
                    }
                };
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%user, error = %e, "query analysis failed"),
        }

        let recent = self.events.recent(user, DEFAULT_RECENT_LIMIT);
        let summaries: Vec<RecentEventSummary> = recent
            .iter()
            .take(EDIT_CONTEXT_EVENTS)
            .map(RecentEventSummary::from)
            .collect();
        match self.model.analyze_edit(message, &summaries).await {
            Ok(intent) if intent.is_edit => {
                return self.handle_edit_request(user, message, &intent).await;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%user, error = %e, "edit analysis failed"),
        }

        match self.model.analyze_task(message).await {
            Ok(analysis) if analysis.is_task => {
                self.sessions
                    .update(user, |s| s.task.merge(&analysis.extracted));
                self.advance_or_confirm(user)
            }
            Ok(_) => reply::idle_help(!recent.is_empty()),
            Err(e) => {
                tracing::warn!(%user, error = %e, "task analysis failed");
                reply::idle_help(!recent.is_empty())
            }
        }
    }

    /// Gathering: parse a free-form reply for any fields, merge, and
    /// move on.
    async fn handle_task_detected(&self, user: &UserKey, message: &str) -> String {
        let session = self.sessions.get_or_create(user);
        let context = format!(
            "User is providing information for task: {}",
            session.task.title.as_deref().unwrap_or("unknown task")
        );

        match self.model.parse_reply(message, &context).await {
            Ok(fields) => self.sessions.update(user, |s| s.task.merge(&fields)),
            Err(e) => tracing::warn!(%user, error = %e, "reply parsing failed"),
        }

        self.advance_or_confirm(user)
    }

    /// A reply to a direct follow-up question is taken verbatim as the
    /// requested field.
    async fn handle_slot_reply(
        &self,
        user: &UserKey,
        field: RequiredField,
        message: &str,
    ) -> String {
        let value = Some(message.to_string());
        self.sessions.update(user, |s| match field {
            RequiredField::Title => s.task.title = value.clone(),
            RequiredField::Date => s.task.date = value.clone(),
            RequiredField::Time => s.task.time = value.clone(),
        });
        self.advance_or_confirm(user)
    }

    async fn handle_awaiting_duration(&self, user: &UserKey, message: &str) -> String {
        self.sessions.update(user, |s| {
            s.task.duration = Some(message.to_string());
            s.state = ConversationState::Confirming;
        });
        let session = self.sessions.get_or_create(user);
        reply::confirmation_prompt(&session.task)
    }

    /// Moves to `Confirming` when nothing required is missing, or asks
    /// for the next missing field in priority order.
    fn advance_or_confirm(&self, user: &UserKey) -> String {
        let session = self.sessions.get_or_create(user);
        match session.task.missing_fields().first() {
            None => {
                self.sessions
                    .update(user, |s| s.state = ConversationState::Confirming);
                reply::confirmation_prompt(&session.task)
            }
            Some(field) => {
                let next_state = match field {
                    RequiredField::Date => ConversationState::AwaitingDate,
                    RequiredField::Time => ConversationState::AwaitingTime,
                    // No dedicated state for a missing title; keep
                    // gathering.
                    RequiredField::Title => ConversationState::TaskDetected,
                };
                self.sessions.update(user, |s| s.state = next_state);
                self.model.follow_up_question(*field, &session.task)
            }
        }
    }

    async fn handle_confirming(&self, user: &UserKey, lowered: &str, message: &str) -> String {
        let task = self.sessions.get_or_create(user).task;

        if AFFIRMATIVE.contains(&lowered) {
            return self.commit_task(user, &task).await;
        }

        if NEGATIVE.contains(&lowered) {
            self.sessions.clear(user);
            return reply::START_OVER.to_string();
        }

        // Neither yes nor no: look for a modification, then re-render
        // the prompt either way.
        match self.model.parse_confirmation_edit(message, &task).await {
            Ok(fields) if !fields.is_empty() => {
                self.sessions.update(user, |s| s.task.merge(&fields));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%user, error = %e, "confirmation edit parsing failed"),
        }
        reply::confirmation_prompt(&self.sessions.get_or_create(user).task)
    }

    async fn commit_task(&self, user: &UserKey, task: &TaskData) -> String {
        match self.calendar.create_event(task).await {
            Ok(created) => {
                self.events.record(
                    user,
                    StoredEvent {
                        event_id: created.event_id,
                        title: task.title.clone().unwrap_or_else(|| "Untitled Task".to_string()),
                        date: task.date.clone().unwrap_or_default(),
                        time: task.time.clone().unwrap_or_default(),
                        duration: task.duration.clone().unwrap_or_else(|| "1 hour".to_string()),
                        created_at: Utc::now(),
                        calendar_url: created.url.clone(),
                    },
                );
                self.sessions.clear(user);
                reply::created_confirmation(task, created.url.as_deref())
            }
            Err(e) => {
                tracing::error!(%user, error = %e, "event creation failed");
                self.sessions.clear(user);
                reply::CREATE_FAILED.to_string()
            }
        }
    }

    async fn handle_selecting_event(&self, user: &UserKey, message: &str) -> String {
        let Some(pending) = self.sessions.get_or_create(user).task.pending_edit else {
            self.sessions.clear(user);
            return reply::RETRY_EDIT.to_string();
        };

        let Ok(selection) = message.parse::<usize>() else {
            return reply::SELECTION_NOT_A_NUMBER.to_string();
        };

        let recent = self.events.recent(user, DEFAULT_RECENT_LIMIT);
        let max = recent.len().min(DEFAULT_RECENT_LIMIT);
        if selection < 1 || selection > max {
            return reply::selection_out_of_range(max);
        }

        let selected = recent[selection - 1].clone();
        self.sessions.clear(user);
        self.apply_event_edit(user, &selected, &pending).await
    }

    async fn handle_edit_request(
        &self,
        user: &UserKey,
        message: &str,
        intent: &EditIntent,
    ) -> String {
        let recent = self.events.recent(user, DEFAULT_RECENT_LIMIT);
        if recent.is_empty() {
            return reply::NO_RECENT_EVENTS.to_string();
        }

        match EventEditResolver::resolve(&recent, message, intent) {
            Some(target) => self.apply_event_edit(user, &target, intent).await,
            None => {
                // Park the intent and ask which event it applies to.
                let pending = intent.clone();
                self.sessions.update(user, |s| {
                    s.task.pending_edit = Some(pending);
                    s.state = ConversationState::SelectingEvent;
                });
                reply::selection_list(&recent)
            }
        }
    }

    async fn apply_event_edit(
        &self,
        user: &UserKey,
        event: &StoredEvent,
        intent: &EditIntent,
    ) -> String {
        let updates = EventUpdates::from_intent(intent);
        if updates.is_empty() {
            return reply::clarify_edit(&event.title);
        }

        match self.calendar.update_event(&event.event_id, &updates).await {
            Ok(url) => {
                self.events.apply_updates(user, &event.event_id, &updates);
                reply::update_confirmation(&event.title, &updates, url.as_deref())
            }
            Err(e) => {
                tracing::error!(%user, event_id = %event.event_id, error = %e, "event update failed");
                reply::update_failed(&event.title)
            }
        }
    }
}
