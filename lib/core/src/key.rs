//! Key types for domain entities.
//!
//! `UserKey` is the stable messaging address used to index sessions,
//! recent-event logs, and rate limits. `EventId` is the opaque identifier
//! assigned by the calendar collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable identity of a messaging user.
///
/// Constructed from the raw sender address of an inbound message, with
/// transport decoration stripped (e.g. the `whatsapp:` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Creates a key from an already-normalized address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Normalizes a raw transport address into a user key.
    ///
    /// Strips a `whatsapp:` prefix if present, then keeps digits and a
    /// leading `+`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.strip_prefix("whatsapp:").unwrap_or(raw);
        let cleaned: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        Self(cleaned)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque identifier for a calendar event, assigned by the calendar
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps a collaborator-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
