//! Conversation session management.
//!
//! Sessions track where each user is in the slot-filling dialogue and
//! the task data collected so far.

use chrono::{DateTime, Utc};
use copper_almanac_core::{TaskData, UserKey};
use serde::{Deserialize, Serialize};

/// The state of a conversation session.
///
/// `Unknown` absorbs any unrecognized persisted value so decoding never
/// fails; the dialogue engine treats it as a signal to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No active task; messages are classified from scratch.
    Idle,
    /// A task was detected and required fields are being collected.
    TaskDetected,
    /// Waiting for the user to provide a date.
    AwaitingDate,
    /// Waiting for the user to provide a time.
    AwaitingTime,
    /// Waiting for the user to provide a duration.
    AwaitingDuration,
    /// Waiting for a yes/no on the assembled task.
    Confirming,
    /// Waiting for the user to pick which event to edit.
    SelectingEvent,
    /// Unrecognized persisted value; recovered by resetting.
    #[serde(other)]
    Unknown,
}

impl ConversationState {
    /// Returns true while required fields are still being gathered.
    #[must_use]
    pub fn is_gathering(&self) -> bool {
        matches!(
            self,
            Self::TaskDetected | Self::AwaitingDate | Self::AwaitingTime | Self::AwaitingDuration
        )
    }
}

/// A conversation session.
///
/// Exactly one exists per user key; it is created on first contact and
/// reset to a fresh `Idle` session on cancel or completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// The user who owns this session.
    pub user_key: UserKey,
    /// Where the dialogue currently stands.
    pub state: ConversationState,
    /// Task data collected so far.
    pub task: TaskData,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session last changed.
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a fresh idle session for a user.
    #[must_use]
    pub fn new(user_key: UserKey) -> Self {
        let now = Utc::now();
        Self {
            user_key,
            state: ConversationState::Idle,
            task: TaskData::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the session to a new state.
    pub fn transition(&mut self, state: ConversationState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Returns the session's idle age relative to `now`.
    #[must_use]
    pub fn idle_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.updated_at).num_seconds() as f64 / 3600.0
    }
}
