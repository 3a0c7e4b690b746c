//! System prompts for the chat-completions backend.
//!
//! Each prompt pins the response to a JSON contract the decode pipeline
//! and analysis types understand.

use crate::analysis::RecentEventSummary;
use copper_almanac_core::TaskData;
use std::fmt::Write as _;

pub const ANALYZE_TASK: &str = r#"You classify user messages as schedulable tasks and extract details.

Extract the task title, the date, the time, and the duration if mentioned.

RESPONSE FORMAT (JSON only):
{
    "is_task": boolean,
    "extracted_info": {
        "title": "clear, concise task title",
        "date": "extracted date (today/tomorrow/Monday/2024-01-15)",
        "time": "extracted time (3pm/15:00/morning/evening)",
        "duration": "duration if mentioned (1 hour/30 minutes)",
        "description": "additional context or details"
    },
    "suggested_questions": ["questions for missing critical info"]
}

Only include fields that are clearly present in the message."#;

pub const ANALYZE_QUERY: &str = r#"You detect calendar listing queries ("what events do I have", "what's on my calendar") and extract the date range.

RESPONSE FORMAT (JSON only):
{
    "is_query": boolean,
    "date_range": "today|tomorrow|this week|next week|specific day"
}

If it's not a listing query, return is_query: false."#;

pub fn analyze_edit(recent_events: &[RecentEventSummary]) -> String {
    let mut context = String::new();
    if !recent_events.is_empty() {
        context.push_str("\nRecent events:\n");
        for (i, event) in recent_events.iter().enumerate() {
            let _ = writeln!(
                context,
                "{}. '{}' on {} at {}",
                i + 1,
                event.title,
                event.date,
                event.time
            );
        }
    }

    format!(
        r#"You detect requests to modify an existing calendar event (change, update, reschedule, move). Be conservative: only mark as an edit when confident. Scheduling a new event or asking about the calendar is not an edit.
{context}
RESPONSE FORMAT (JSON only):
{{
    "is_edit": boolean,
    "edit_type": "title|time|duration|date|multiple",
    "new_value": "extracted new value if clear",
    "event_reference": "which event to edit (last|recent|specific title)",
    "extracted_info": {{
        "field_to_edit": "specific field name",
        "new_title": "new title if changing title",
        "new_time": "new time if changing time",
        "new_duration": "new duration if changing duration",
        "new_date": "new date if changing date",
        "event_identifier": "how the user referred to the event"
    }}
}}"#
    )
}

pub fn parse_reply(context: &str) -> String {
    format!(
        r#"You parse replies in a task-scheduling conversation.

Context: {context}

Extract dates (today, tomorrow, Monday, next Friday, December 25, 25th), times (3pm, 15:00, morning), and durations (1 hour, 30 minutes).

RESPONSE FORMAT (JSON only):
{{
    "date": "parsed date if provided",
    "time": "parsed time if provided",
    "duration": "duration in standard form (e.g. '60 minutes')"
}}

Only include fields clearly mentioned in the reply."#
    )
}

pub fn parse_confirmation_edit(task: &TaskData) -> String {
    let current = serde_json::to_string_pretty(task).unwrap_or_default();
    format!(
        r#"The user is confirming a task and replied with something other than a plain yes or no. Detect changes to the task details.

Current task details:
{current}

RESPONSE FORMAT (JSON only):
{{
    "title": "new title if changed",
    "date": "new date if changed",
    "time": "new time if changed",
    "duration": "new duration if changed"
}}

Only include fields the user wants to change. If the message is not a modification request, return an empty JSON object."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_prompt_lists_recent_events() {
        let events = vec![RecentEventSummary {
            title: "Team sync".to_string(),
            date: "Friday".to_string(),
            time: "2pm".to_string(),
        }];
        let prompt = analyze_edit(&events);
        assert!(prompt.contains("1. 'Team sync' on Friday at 2pm"));
    }

    #[test]
    fn confirmation_prompt_embeds_current_task() {
        let task = TaskData {
            title: Some("Run".to_string()),
            ..Default::default()
        };
        assert!(parse_confirmation_edit(&task).contains("Run"));
    }
}
