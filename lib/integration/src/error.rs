//! Error types for the integration crate.
//!
//! Calendar errors never reach users directly; the dialogue layer maps
//! them to apology replies.

use copper_almanac_core::EventId;
use std::fmt;

/// Errors from calendar operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The backend is not configured or unreachable.
    Unavailable { reason: String },
    /// The event's date or time could not be resolved.
    InvalidEvent { reason: String },
    /// The API rejected or failed the request.
    RequestFailed { reason: String },
    /// The referenced event does not exist.
    EventNotFound { id: EventId },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => {
                write!(f, "calendar unavailable: {reason}")
            }
            Self::InvalidEvent { reason } => {
                write!(f, "invalid event: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "calendar request failed: {reason}")
            }
            Self::EventNotFound { id } => {
                write!(f, "event not found: {id}")
            }
        }
    }
}

impl std::error::Error for CalendarError {}
