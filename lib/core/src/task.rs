//! Task data collected across a slot-filling conversation.
//!
//! Fields stay free text until the calendar collaborator resolves them;
//! the dialogue engine only tracks which required slots are still open.

use crate::edit::EditIntent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The required slots of a task, in declared priority order.
///
/// `missing_fields` reports absences in this order, and the dialogue
/// engine asks follow-up questions in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    /// What the task is.
    Title,
    /// The day it happens.
    Date,
    /// The time it starts.
    Time,
}

impl RequiredField {
    /// All required fields in priority order.
    pub const ALL: [Self; 3] = [Self::Title, Self::Date, Self::Time];

    /// The field name as used in collaborator prompts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Task attributes collected so far in a conversation.
///
/// All values are free text as the user (or the language-model
/// collaborator) produced them. `duration` is optional with a default
/// applied at event-creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    /// Task title/summary.
    pub title: Option<String>,
    /// Task date (free text, e.g. "tomorrow", "Friday", "2024-01-15").
    pub date: Option<String>,
    /// Task time (free text, e.g. "3pm", "morning").
    pub time: Option<String>,
    /// Duration (free text or minutes, e.g. "1 hour").
    pub duration: Option<String>,
    /// Additional context.
    pub description: Option<String>,
    /// Location, if mentioned.
    pub location: Option<String>,
    /// An edit intent parked while the user picks which event to edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_edit: Option<EditIntent>,
}

/// A partial field map extracted by the language-model collaborator.
///
/// Absent and blank values mean "undetermined"; only non-blank values
/// are merged into task data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl ExtractedFields {
    /// Returns true if no field carries a usable value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.date,
            &self.time,
            &self.duration,
            &self.description,
            &self.location,
        ]
        .iter()
        .all(|f| !has_value(f))
    }
}

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl TaskData {
    /// Merges extracted fields into the task, last-write-wins.
    ///
    /// Only non-blank extracted values overwrite; there is no
    /// partial-string merging.
    pub fn merge(&mut self, extracted: &ExtractedFields) {
        let pairs = [
            (&mut self.title, &extracted.title),
            (&mut self.date, &extracted.date),
            (&mut self.time, &extracted.time),
            (&mut self.duration, &extracted.duration),
            (&mut self.description, &extracted.description),
            (&mut self.location, &extracted.location),
        ];
        for (slot, value) in pairs {
            if has_value(value) {
                *slot = value.clone();
            }
        }
    }

    /// Returns the required fields that are still absent or blank,
    /// in priority order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| !has_value(self.get(*field)))
            .collect()
    }

    /// Returns true when every required field has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn get(&self, field: RequiredField) -> &Option<String> {
        match field {
            RequiredField::Title => &self.title,
            RequiredField::Date => &self.date,
            RequiredField::Time => &self.time,
        }
    }
}
