//! Edit intents and the update patches derived from them.
//!
//! An `EditIntent` is the structured result of edit-request analysis by
//! the language-model collaborator. The dialogue layer turns a resolved
//! intent into an `EventUpdates` patch for the calendar collaborator.

use serde::{Deserialize, Serialize};

/// Which aspect of an event the user wants to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Title,
    Time,
    Duration,
    Date,
    /// More than one field changes in a single request.
    Multiple,
}

/// Field-level details extracted from an edit request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditFields {
    /// Specific field name, as the model named it.
    pub field_to_edit: Option<String>,
    pub new_title: Option<String>,
    pub new_time: Option<String>,
    pub new_duration: Option<String>,
    pub new_date: Option<String>,
    /// How the user referred to the event (used for title matching).
    pub event_identifier: Option<String>,
}

/// The structured result of analyzing a message for an edit request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditIntent {
    /// Whether the message is an edit request at all.
    pub is_edit: bool,
    /// The kind of edit, if the model could tell.
    pub edit_type: Option<EditKind>,
    /// The new value, when a single clear value was given.
    pub new_value: Option<String>,
    /// Which event to edit ("last", or a title fragment).
    pub event_reference: Option<String>,
    /// Extracted field-level details.
    pub extracted_info: EditFields,
}

impl EditIntent {
    /// A non-edit result, used when analysis fails or finds nothing.
    #[must_use]
    pub fn not_an_edit() -> Self {
        Self::default()
    }
}

/// The `{title, date, time, duration}` patch derived from a resolved
/// edit intent, applied to both the calendar and the stored copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventUpdates {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
}

impl EventUpdates {
    /// Returns true when no field is updated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.duration.is_none()
    }

    /// Derives the update patch from an edit intent.
    ///
    /// The edit type (or the presence of a specific `new_<field>` value)
    /// selects which field to update; `Multiple` merges every present
    /// `new_*` field. An empty patch means the intent was too vague to
    /// act on.
    #[must_use]
    pub fn from_intent(intent: &EditIntent) -> Self {
        let info = &intent.extracted_info;
        let mut updates = Self::default();

        let pick = |specific: &Option<String>| -> Option<String> {
            specific.clone().or_else(|| intent.new_value.clone())
        };

        match intent.edit_type {
            Some(EditKind::Multiple) => {
                updates.title = info.new_title.clone();
                updates.time = info.new_time.clone();
                updates.duration = info.new_duration.clone();
                updates.date = info.new_date.clone();
            }
            Some(EditKind::Title) => updates.title = pick(&info.new_title),
            Some(EditKind::Time) => updates.time = pick(&info.new_time),
            Some(EditKind::Duration) => updates.duration = pick(&info.new_duration),
            Some(EditKind::Date) => updates.date = pick(&info.new_date),
            None => {
                // No declared type; fall back to whichever new_* value
                // is present, first match wins.
                if info.new_title.is_some() {
                    updates.title = info.new_title.clone();
                } else if info.new_time.is_some() {
                    updates.time = info.new_time.clone();
                } else if info.new_duration.is_some() {
                    updates.duration = info.new_duration.clone();
                } else if info.new_date.is_some() {
                    updates.date = info.new_date.clone();
                }
            }
        }

        updates
    }
}
