//! Conversation flow tests with scripted collaborators.

use async_trait::async_trait;
use chrono::Utc;
use copper_almanac_ai::{
    LanguageModel, LlmError, QueryAnalysis, RecentEventSummary, TaskAnalysis,
};
use copper_almanac_conversation::ConversationState;
use copper_almanac_core::{
    EditIntent, EditKind, EventId, EventUpdates, ExtractedFields, StoredEvent, TaskData, UserKey,
};
use copper_almanac_dialogue::DialogueEngine;
use copper_almanac_integration::{
    Calendar, CalendarError, CreatedEvent, SlidingWindowConfig, SlidingWindowLimiter,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScriptedModel {
    query: Option<QueryAnalysis>,
    edit: Option<EditIntent>,
    task: Option<TaskAnalysis>,
    reply_fields: Option<ExtractedFields>,
    confirmation_fields: Option<ExtractedFields>,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn analyze_task(&self, _message: &str) -> Result<TaskAnalysis, LlmError> {
        Ok(self.task.clone().unwrap_or_else(TaskAnalysis::not_a_task))
    }

    async fn analyze_edit(
        &self,
        _message: &str,
        _recent_events: &[RecentEventSummary],
    ) -> Result<EditIntent, LlmError> {
        Ok(self.edit.clone().unwrap_or_else(EditIntent::not_an_edit))
    }

    async fn analyze_query(&self, _message: &str) -> Result<QueryAnalysis, LlmError> {
        Ok(self.query.clone().unwrap_or_else(QueryAnalysis::not_a_query))
    }

    async fn parse_reply(
        &self,
        _message: &str,
        _context: &str,
    ) -> Result<ExtractedFields, LlmError> {
        Ok(self.reply_fields.clone().unwrap_or_default())
    }

    async fn parse_confirmation_edit(
        &self,
        _message: &str,
        _task: &TaskData,
    ) -> Result<ExtractedFields, LlmError> {
        Ok(self.confirmation_fields.clone().unwrap_or_default())
    }
}

#[derive(Default)]
struct ScriptedCalendar {
    fail_create: bool,
    created: Mutex<Vec<TaskData>>,
    updated: Mutex<Vec<(EventId, EventUpdates)>>,
}

#[async_trait]
impl Calendar for ScriptedCalendar {
    async fn create_event(&self, task: &TaskData) -> Result<CreatedEvent, CalendarError> {
        if self.fail_create {
            return Err(CalendarError::Unavailable {
                reason: "scripted failure".to_string(),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push(task.clone());
        Ok(CreatedEvent {
            event_id: EventId::new(format!("evt-{}", created.len())),
            url: Some("https://cal.example/evt".to_string()),
        })
    }

    async fn update_event(
        &self,
        event_id: &EventId,
        updates: &EventUpdates,
    ) -> Result<Option<String>, CalendarError> {
        self.updated
            .lock()
            .unwrap()
            .push((event_id.clone(), updates.clone()));
        Ok(Some("https://cal.example/evt".to_string()))
    }

    async fn list_events(&self, date_range: &str) -> Result<String, CalendarError> {
        Ok(format!("Here are your events for {date_range}:"))
    }
}

fn engine(model: ScriptedModel, calendar: ScriptedCalendar) -> (DialogueEngine, Arc<ScriptedCalendar>) {
    let calendar = Arc::new(calendar);
    let engine = DialogueEngine::new(
        Arc::new(model),
        Arc::clone(&calendar) as Arc<dyn Calendar>,
        SlidingWindowLimiter::new(SlidingWindowConfig::new(100, 60)),
    );
    (engine, calendar)
}

fn user() -> UserKey {
    UserKey::new("+14155551234")
}

fn stored(id: &str, title: &str) -> StoredEvent {
    StoredEvent {
        event_id: EventId::new(id),
        title: title.to_string(),
        date: "Friday".to_string(),
        time: "2pm".to_string(),
        duration: "1h".to_string(),
        created_at: Utc::now(),
        calendar_url: None,
    }
}

fn task_analysis(title: &str, date: Option<&str>, time: Option<&str>) -> TaskAnalysis {
    TaskAnalysis {
        is_task: true,
        extracted: ExtractedFields {
            title: Some(title.to_string()),
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            ..Default::default()
        },
        suggested_questions: Vec::new(),
    }
}

#[tokio::test]
async fn slot_filling_runs_from_detection_to_created_event() {
    let model = ScriptedModel {
        task: Some(task_analysis("Call John", Some("tomorrow"), None)),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());

    let reply = engine
        .handle_inbound_message(&user(), "remind me to call John tomorrow")
        .await;
    assert!(reply.contains("What time works best for 'Call John'"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::AwaitingTime
    );

    let reply = engine.handle_inbound_message(&user(), "3pm").await;
    assert!(reply.contains("Task: Call John"));
    assert!(reply.contains("Time: 3pm"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Confirming
    );

    let reply = engine.handle_inbound_message(&user(), "yes").await;
    assert!(reply.contains("I've added 'Call John'"));
    assert_eq!(calendar.created.lock().unwrap().len(), 1);
    assert_eq!(engine.events().count(&user()), 1);

    // Completion resets the session.
    let session = engine.sessions().get_or_create(&user());
    assert_eq!(session.state, ConversationState::Idle);
    assert!(session.task.title.is_none());
}

#[tokio::test]
async fn complete_task_goes_straight_to_confirmation() {
    let model = ScriptedModel {
        task: Some(task_analysis("Standup", Some("Friday"), Some("9am"))),
        ..Default::default()
    };
    let (engine, _) = engine(model, ScriptedCalendar::default());

    let reply = engine
        .handle_inbound_message(&user(), "standup friday at 9")
        .await;
    assert!(reply.contains("Let me confirm the details"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Confirming
    );
}

#[tokio::test]
async fn query_intent_preempts_task_detection() {
    let model = ScriptedModel {
        query: Some(QueryAnalysis {
            is_query: true,
            date_range: Some("this week".to_string()),
        }),
        // Even a positive task classification must not run.
        task: Some(task_analysis("bogus", None, None)),
        ..Default::default()
    };
    let (engine, _) = engine(model, ScriptedCalendar::default());

    let reply = engine
        .handle_inbound_message(&user(), "what's on my calendar this week?")
        .await;
    assert_eq!(reply, "Here are your events for this week:");
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn negative_confirmation_restarts() {
    let model = ScriptedModel {
        task: Some(task_analysis("Standup", Some("Friday"), Some("9am"))),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());

    engine.handle_inbound_message(&user(), "standup friday 9am").await;
    let reply = engine.handle_inbound_message(&user(), "no").await;
    assert!(reply.contains("start over"));
    assert!(calendar.created.lock().unwrap().is_empty());
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn confirmation_modification_rerenders_the_prompt() {
    let model = ScriptedModel {
        task: Some(task_analysis("Standup", Some("Friday"), Some("9am"))),
        confirmation_fields: Some(ExtractedFields {
            time: Some("10am".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());

    engine.handle_inbound_message(&user(), "standup friday 9am").await;
    let reply = engine
        .handle_inbound_message(&user(), "actually make it 10am")
        .await;
    assert!(reply.contains("Time: 10am"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Confirming
    );
    assert!(calendar.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_creation_apologizes_and_resets() {
    let model = ScriptedModel {
        task: Some(task_analysis("Standup", Some("Friday"), Some("9am"))),
        ..Default::default()
    };
    let calendar = ScriptedCalendar {
        fail_create: true,
        ..Default::default()
    };
    let (engine, _) = engine(model, calendar);

    engine.handle_inbound_message(&user(), "standup friday 9am").await;
    let reply = engine.handle_inbound_message(&user(), "yes").await;
    assert!(reply.contains("couldn't create"));
    assert_eq!(engine.events().count(&user()), 0);
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn ambiguous_edit_goes_through_selection() {
    let model = ScriptedModel {
        edit: Some(EditIntent {
            is_edit: true,
            edit_type: Some(EditKind::Time),
            new_value: Some("4pm".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());
    engine.events().record(&user(), stored("1", "Dentist"));
    engine.events().record(&user(), stored("2", "Standup"));

    let reply = engine
        .handle_inbound_message(&user(), "change the time to 4pm")
        .await;
    assert!(reply.contains("Which event would you like to edit?"));
    assert!(reply.contains("1. 'Standup'"));
    assert!(reply.contains("2. 'Dentist'"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::SelectingEvent
    );

    // Invalid selections re-prompt without losing the pending edit.
    let reply = engine.handle_inbound_message(&user(), "soon").await;
    assert!(reply.contains("reply with a number"));
    let reply = engine.handle_inbound_message(&user(), "7").await;
    assert!(reply.contains("between 1 and 2"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::SelectingEvent
    );

    let reply = engine.handle_inbound_message(&user(), "2").await;
    assert!(reply.contains("Updated 'Dentist' successfully"));
    assert!(reply.contains("New time: 4pm"));

    let updated = calendar.updated.lock().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, EventId::new("1"));
    assert_eq!(updated[0].1.time.as_deref(), Some("4pm"));
    drop(updated);

    // The stored copy reflects the change and the session is idle again.
    assert_eq!(engine.events().recent(&user(), 5)[1].time, "4pm");
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn sole_recent_event_is_edited_without_asking() {
    let model = ScriptedModel {
        edit: Some(EditIntent {
            is_edit: true,
            edit_type: Some(EditKind::Time),
            new_value: Some("4pm".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());
    engine.events().record(&user(), stored("1", "Dentist"));

    let reply = engine
        .handle_inbound_message(&user(), "move it to 4pm")
        .await;
    assert!(reply.contains("Updated 'Dentist' successfully"));
    assert_eq!(calendar.updated.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn vague_edit_asks_for_specifics_without_touching_anything() {
    let model = ScriptedModel {
        edit: Some(EditIntent {
            is_edit: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let (engine, calendar) = engine(model, ScriptedCalendar::default());
    engine.events().record(&user(), stored("1", "Dentist"));

    let reply = engine
        .handle_inbound_message(&user(), "change the dentist thing")
        .await;
    assert!(reply.contains("not sure what you want to change about 'Dentist'"));
    assert!(calendar.updated.lock().unwrap().is_empty());
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn edit_without_history_suggests_creating_first() {
    let model = ScriptedModel {
        edit: Some(EditIntent {
            is_edit: true,
            edit_type: Some(EditKind::Time),
            new_value: Some("4pm".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let (engine, _) = engine(model, ScriptedCalendar::default());

    let reply = engine
        .handle_inbound_message(&user(), "move my meeting to 4pm")
        .await;
    assert!(reply.contains("don't see any recent events"));
}

#[tokio::test]
async fn cancel_clears_mid_conversation() {
    let model = ScriptedModel {
        task: Some(task_analysis("Call John", Some("tomorrow"), None)),
        ..Default::default()
    };
    let (engine, _) = engine(model, ScriptedCalendar::default());

    engine
        .handle_inbound_message(&user(), "remind me to call John tomorrow")
        .await;
    let reply = engine.handle_inbound_message(&user(), "cancel").await;
    assert!(reply.contains("cancelled"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}

#[tokio::test]
async fn help_command_works_in_any_state() {
    let (engine, _) = engine(ScriptedModel::default(), ScriptedCalendar::default());
    let reply = engine.handle_inbound_message(&user(), "help").await;
    assert!(reply.contains("Create Events"));
    assert!(reply.contains("'cancel'"));
}

#[tokio::test]
async fn unclassified_message_gets_usage_help() {
    let (engine, _) = engine(ScriptedModel::default(), ScriptedCalendar::default());
    let reply = engine.handle_inbound_message(&user(), "how are you?").await;
    assert!(reply.contains("What would you like to do?"));
    assert!(!reply.contains("Edit existing events"));
}

#[tokio::test]
async fn rate_limit_throttles_after_the_ceiling() {
    let calendar = Arc::new(ScriptedCalendar::default());
    let engine = DialogueEngine::new(
        Arc::new(ScriptedModel::default()),
        calendar as Arc<dyn Calendar>,
        SlidingWindowLimiter::new(SlidingWindowConfig::new(1, 60)),
    );

    engine.handle_inbound_message(&user(), "hello").await;
    let reply = engine.handle_inbound_message(&user(), "hello again").await;
    assert!(reply.contains("too quickly"));
}

#[tokio::test]
async fn unknown_session_state_recovers_by_resetting() {
    let (engine, _) = engine(ScriptedModel::default(), ScriptedCalendar::default());
    engine
        .sessions()
        .update(&user(), |s| s.state = ConversationState::Unknown);

    let reply = engine.handle_inbound_message(&user(), "hello").await;
    assert!(reply.contains("Something went wrong"));
    assert_eq!(
        engine.sessions().get_or_create(&user()).state,
        ConversationState::Idle
    );
}
