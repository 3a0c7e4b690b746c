//! The language-model collaborator contract.

use crate::analysis::{QueryAnalysis, RecentEventSummary, TaskAnalysis};
use crate::error::LlmError;
use async_trait::async_trait;
use copper_almanac_core::{EditIntent, ExtractedFields, RequiredField, TaskData};

/// Maximum recent events passed as context to edit analysis.
pub const EDIT_CONTEXT_EVENTS: usize = 3;

/// The natural-language understanding contract consumed by the dialogue
/// engine.
///
/// Every fallible operation may return an error; callers treat that the
/// same as an empty result ("field undetermined"), never as fatal.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classifies a message as a schedulable task and extracts fields.
    async fn analyze_task(&self, message: &str) -> Result<TaskAnalysis, LlmError>;

    /// Classifies a message as an edit request against recent events.
    async fn analyze_edit(
        &self,
        message: &str,
        recent_events: &[RecentEventSummary],
    ) -> Result<EditIntent, LlmError>;

    /// Classifies a message as a calendar listing query.
    async fn analyze_query(&self, message: &str) -> Result<QueryAnalysis, LlmError>;

    /// Parses a free-form reply for field values, given conversation
    /// context.
    async fn parse_reply(
        &self,
        message: &str,
        context: &str,
    ) -> Result<ExtractedFields, LlmError>;

    /// Parses a non-yes/no reply during confirmation for modifications
    /// to the in-progress task.
    async fn parse_confirmation_edit(
        &self,
        message: &str,
        task: &TaskData,
    ) -> Result<ExtractedFields, LlmError>;

    /// Produces the follow-up question for a missing field.
    ///
    /// Template-based and infallible; implementations may override with
    /// generated phrasing.
    fn follow_up_question(&self, field: RequiredField, task: &TaskData) -> String {
        let title = task.title.as_deref().unwrap_or("your task");
        match field {
            RequiredField::Date => format!(
                "What date would you like to schedule '{title}'? \
                 You can say something like 'tomorrow', 'next Friday', or a specific date."
            ),
            RequiredField::Time => format!(
                "What time works best for '{title}'? \
                 You can specify like '3pm', '15:00', or 'morning'."
            ),
            RequiredField::Title => {
                "Could you tell me what the task is about?".to_string()
            }
        }
    }
}
