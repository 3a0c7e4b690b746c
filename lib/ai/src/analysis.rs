//! Structured analysis results returned by the language model.
//!
//! All types deserialize leniently: absent fields take defaults so a
//! partially well-formed model response still yields a usable value.

use copper_almanac_core::{ExtractedFields, StoredEvent};
use serde::{Deserialize, Serialize};

/// Result of classifying a message as a schedulable task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAnalysis {
    /// Whether the message describes a task at all.
    pub is_task: bool,
    /// Fields the model extracted from the message.
    #[serde(rename = "extracted_info")]
    pub extracted: ExtractedFields,
    /// Questions the model suggests for missing critical info.
    pub suggested_questions: Vec<String>,
}

impl TaskAnalysis {
    /// A non-task result, used when analysis fails.
    #[must_use]
    pub fn not_a_task() -> Self {
        Self::default()
    }
}

/// Result of classifying a message as a calendar query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryAnalysis {
    /// Whether the user is asking for a list of events.
    pub is_query: bool,
    /// The date range to list ("today", "this week", a specific day).
    pub date_range: Option<String>,
}

impl QueryAnalysis {
    /// A non-query result, used when analysis fails.
    #[must_use]
    pub fn not_a_query() -> Self {
        Self::default()
    }

    /// The date range, defaulting to today.
    #[must_use]
    pub fn range_or_today(&self) -> &str {
        self.date_range.as_deref().unwrap_or("today")
    }
}

/// A compact event summary passed as context for edit analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEventSummary {
    pub title: String,
    pub date: String,
    pub time: String,
}

impl From<&StoredEvent> for RecentEventSummary {
    fn from(event: &StoredEvent) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
        }
    }
}
