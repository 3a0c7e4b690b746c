//! User-facing reply texts.
//!
//! Everything the engine says lives here so handlers stay about control
//! flow and the texts stay testable.

use copper_almanac_core::{EventUpdates, StoredEvent, TaskData};
use copper_almanac_resolver::{duration_minutes, format_minutes};
use std::fmt::Write as _;

pub const CANCELLED: &str =
    "Task scheduling cancelled. Feel free to send me another task anytime! \u{1F60A}";

pub const RATE_LIMITED: &str =
    "You're sending messages too quickly. Please wait a moment before sending another message.";

pub const UNKNOWN_STATE: &str = "Something went wrong. Let's start over. \
     Please send me a task you'd like to schedule! \u{1F60A}";

pub const START_OVER: &str = "No problem! Let's start over. \
     Please send me your task again with the correct details. \u{1F60A}";

pub const CREATE_FAILED: &str =
    "Sorry, I couldn't create the calendar event. Please check your calendar \
     settings and try again.\n\nFeel free to send me another task! \u{1F60A}";

pub const CALENDAR_UNAVAILABLE: &str = "Sorry, I can't access your calendar right now.";

pub const NO_RECENT_EVENTS: &str =
    "I don't see any recent events to edit. Please create an event first, \
     then you can edit it!\n\nTry: 'Schedule a meeting tomorrow at 2pm'";

pub const RETRY_EDIT: &str = "Something went wrong. Please try your edit request again.";

pub const SELECTION_NOT_A_NUMBER: &str =
    "Please reply with a number (1-5) to select which event you want to edit.";

pub const HELP: &str = "\u{1F916} Task Scheduling Help\n\n\
     I can help you schedule tasks and add them to your calendar!\n\n\
     \u{1F4DD} Create Events:\n\
     \u{2022} 'Remind me to call John tomorrow at 3pm'\n\
     \u{2022} 'Meeting with team on Friday at 2pm'\n\
     \u{2022} 'Doctor appointment next Tuesday at 10am'\n\
     \u{2022} 'Lunch with Sarah on Monday'\n\n\
     \u{270F} Edit Events:\n\
     \u{2022} 'Change my meeting time to 4pm'\n\
     \u{2022} 'Update the title to Sprint Planning'\n\
     \u{2022} 'Make the duration 2 hours'\n\
     \u{2022} 'Reschedule to tomorrow'\n\n\
     \u{1F527} Commands:\n\
     \u{2022} 'help' - Show this help message\n\
     \u{2022} 'cancel' - Cancel current operation\n\n\
     Just send me a message describing what you want to do! \u{1F60A}";

/// The fallback for an idle message that is neither query, edit, nor
/// task. Edit examples appear only once the user has something to edit.
#[must_use]
pub fn idle_help(has_recent_events: bool) -> String {
    let mut text = String::from(
        "I help you schedule tasks and add them to your calendar! \u{1F4C5}\n\n\
         \u{1F4DD} Create new events:\n\
         \u{2022} 'Remind me to call John tomorrow at 3pm'\n\
         \u{2022} 'Meeting with team on Friday'\n\
         \u{2022} 'Doctor appointment next Tuesday at 10am'\n\n",
    );
    if has_recent_events {
        text.push_str(
            "\u{270F} Edit existing events:\n\
             \u{2022} 'Change my meeting time to 4pm'\n\
             \u{2022} 'Update the title to Sprint Planning'\n\
             \u{2022} 'Make the duration 2 hours'\n\n",
        );
    }
    text.push_str("What would you like to do?");
    text
}

/// Renders free-text duration in compact form ("1 hour" becomes "1h").
fn duration_display(duration: Option<&str>) -> String {
    match duration {
        Some(text) => format_minutes(duration_minutes(text)),
        None => "1h".to_string(),
    }
}

/// The yes/no confirmation prompt for an assembled task.
#[must_use]
pub fn confirmation_prompt(task: &TaskData) -> String {
    format!(
        "Great! Let me confirm the details:\n\n\
         \u{1F4DD} Task: {}\n\
         \u{1F4C5} Date: {}\n\
         \u{23F0} Time: {}\n\
         \u{23F1} Duration: {}\n\n\
         Should I add this to your calendar? Reply 'yes' to confirm or 'no' to cancel.",
        task.title.as_deref().unwrap_or("Your task"),
        task.date.as_deref().unwrap_or("Not specified"),
        task.time.as_deref().unwrap_or("Not specified"),
        task.duration.as_deref().unwrap_or("1 hour"),
    )
}

/// The success message after an event is created.
#[must_use]
pub fn created_confirmation(task: &TaskData, url: Option<&str>) -> String {
    let mut text = format!(
        "\u{2705} Perfect! I've added '{}' to your calendar.\n\n\
         \u{1F4C5} Date: {}\n\
         \u{23F0} Time: {}\n\
         \u{23F1} Duration: {}\n\n\
         You'll receive reminders 15 minutes and 1 hour before the event.",
        task.title.as_deref().unwrap_or("Your task"),
        task.date.as_deref().unwrap_or(""),
        task.time.as_deref().unwrap_or(""),
        duration_display(task.duration.as_deref()),
    );
    if let Some(url) = url {
        let _ = write!(text, "\n\nView in calendar: {url}");
    }
    text
}

/// The success message after an event is updated.
#[must_use]
pub fn update_confirmation(title: &str, updates: &EventUpdates, url: Option<&str>) -> String {
    let mut text = format!("\u{2705} Updated '{title}' successfully!\n\n");
    if let Some(new_title) = &updates.title {
        let _ = writeln!(text, "\u{1F4DD} New title: {new_title}");
    }
    if let Some(new_date) = &updates.date {
        let _ = writeln!(text, "\u{1F4C5} New date: {new_date}");
    }
    if let Some(new_time) = &updates.time {
        let _ = writeln!(text, "\u{23F0} New time: {new_time}");
    }
    if let Some(new_duration) = &updates.duration {
        let _ = writeln!(
            text,
            "\u{23F1} New duration: {}",
            duration_display(Some(new_duration))
        );
    }
    if let Some(url) = url {
        let _ = write!(text, "\nView updated event: {url}");
    }
    text
}

/// The failure message when a specific event could not be updated.
#[must_use]
pub fn update_failed(title: &str) -> String {
    format!("Sorry, I couldn't update '{title}'. Please try again or check your calendar manually.")
}

/// Asks which of the candidate events an edit applies to.
#[must_use]
pub fn selection_list(candidates: &[StoredEvent]) -> String {
    let mut text = String::from("Which event would you like to edit?\n\n");
    for (i, event) in candidates.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. '{}' on {} at {}",
            i + 1,
            event.title,
            event.date,
            event.time
        );
    }
    let _ = write!(
        text,
        "\nReply with the number (1-{}) of the event you want to edit.",
        candidates.len()
    );
    text
}

/// Re-prompt for a selection outside the offered range.
#[must_use]
pub fn selection_out_of_range(max: usize) -> String {
    format!("Please choose a number between 1 and {max}.")
}

/// Asks what an underspecified edit should change.
#[must_use]
pub fn clarify_edit(title: &str) -> String {
    format!(
        "I'm not sure what you want to change about '{title}'. Could you be more specific?\n\n\
         For example: 'Change the time to 4pm' or 'Update the title to Team Meeting'"
    )
}
