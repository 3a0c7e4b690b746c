//! Per-user history of recently created events.
//!
//! Bounded and newest-first; edit requests are resolved against this
//! log rather than querying the calendar.

use copper_almanac_core::{EventId, EventUpdates, StoredEvent, UserKey};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Maximum events remembered per user.
pub const MAX_EVENTS_PER_USER: usize = 10;

/// Default number of candidates offered for selection.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// In-memory, per-user record of created events, newest first.
///
/// Cloning shares the underlying map.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Arc<RwLock<HashMap<UserKey, Vec<StoredEvent>>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly created event at the front of the user's history.
    pub fn record(&self, user_key: &UserKey, event: StoredEvent) {
        let mut events = self.events.write().unwrap();
        let history = events.entry(user_key.clone()).or_default();
        history.insert(0, event);
        history.truncate(MAX_EVENTS_PER_USER);
    }

    /// Returns up to `limit` most recent events.
    #[must_use]
    pub fn recent(&self, user_key: &UserKey, limit: usize) -> Vec<StoredEvent> {
        let events = self.events.read().unwrap();
        events
            .get(user_key)
            .map(|history| history.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the event at a zero-based index in recency order.
    #[must_use]
    pub fn by_index(&self, user_key: &UserKey, index: usize) -> Option<StoredEvent> {
        self.recent(user_key, DEFAULT_RECENT_LIMIT).get(index).cloned()
    }

    /// Finds the first event whose title contains `fragment`,
    /// case-insensitively, in recency order.
    #[must_use]
    pub fn find_by_title(&self, user_key: &UserKey, fragment: &str) -> Option<StoredEvent> {
        let fragment = fragment.to_lowercase();
        let events = self.events.read().unwrap();
        events
            .get(user_key)?
            .iter()
            .find(|event| event.title.to_lowercase().contains(&fragment))
            .cloned()
    }

    /// Applies edit updates to the stored copy of an event.
    ///
    /// Returns false when the event is no longer in the log.
    pub fn apply_updates(
        &self,
        user_key: &UserKey,
        event_id: &EventId,
        updates: &EventUpdates,
    ) -> bool {
        let mut events = self.events.write().unwrap();
        let Some(history) = events.get_mut(user_key) else {
            return false;
        };
        match history.iter_mut().find(|event| &event.event_id == event_id) {
            Some(event) => {
                event.apply(updates);
                true
            }
            None => false,
        }
    }

    /// Number of events stored for a user.
    #[must_use]
    pub fn count(&self, user_key: &UserKey) -> usize {
        let events = self.events.read().unwrap();
        events.get(user_key).map_or(0, Vec::len)
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}
