//! Process-wide session registry.
//!
//! Constructed once at startup and shared by handle; sessions are
//! sharded by user key. A per-user turn lock serializes concurrent
//! messages from the same user, since last-write-wins merges and state
//! transitions are not safe under interleaving.

use crate::session::ConversationSession;
use chrono::{DateTime, Utc};
use copper_almanac_core::UserKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// In-memory registry of conversation sessions.
///
/// Cloning shares the underlying maps.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<UserKey, ConversationSession>>>,
    turn_locks: Arc<Mutex<HashMap<UserKey, Arc<tokio::sync::Mutex<()>>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's session, creating a fresh idle one on first
    /// contact.
    #[must_use]
    pub fn get_or_create(&self, user_key: &UserKey) -> ConversationSession {
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .entry(user_key.clone())
            .or_insert_with(|| ConversationSession::new(user_key.clone()))
            .clone()
    }

    /// Mutates the user's session in place, bumping `updated_at`.
    pub fn update<F>(&self, user_key: &UserKey, mutate: F)
    where
        F: FnOnce(&mut ConversationSession),
    {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .entry(user_key.clone())
            .or_insert_with(|| ConversationSession::new(user_key.clone()));
        mutate(session);
        session.updated_at = Utc::now();
    }

    /// Resets the user's session to a fresh idle one.
    pub fn clear(&self, user_key: &UserKey) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(user_key.clone(), ConversationSession::new(user_key.clone()));
    }

    /// Evicts sessions idle longer than `max_age_hours`, returning the
    /// eviction count.
    pub fn cleanup_expired(&self, max_age_hours: f64) -> usize {
        self.cleanup_expired_at(max_age_hours, Utc::now())
    }

    /// Clock-injected variant of [`cleanup_expired`](Self::cleanup_expired).
    pub fn cleanup_expired_at(&self, max_age_hours: f64, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_hours(now) <= max_age_hours);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle sessions");
        }
        evicted
    }

    /// Returns the per-user turn lock.
    ///
    /// Callers hold this for the duration of one message turn so two
    /// concurrent messages from the same user are processed one at a
    /// time.
    #[must_use]
    pub fn turn_lock(&self, user_key: &UserKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.turn_locks.lock().unwrap();
        locks
            .entry(user_key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Returns true when no sessions exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            turn_locks: Arc::clone(&self.turn_locks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ConversationState;
    use chrono::Duration;

    fn key(s: &str) -> UserKey {
        UserKey::new(s)
    }

    #[test]
    fn first_contact_creates_idle_session() {
        let store = SessionStore::new();
        let session = store.get_or_create(&key("+1"));
        assert_eq!(session.state, ConversationState::Idle);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn one_session_per_user_key() {
        let store = SessionStore::new();
        store.get_or_create(&key("+1"));
        store.get_or_create(&key("+1"));
        store.get_or_create(&key("+2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_persists_changes() {
        let store = SessionStore::new();
        store.update(&key("+1"), |s| {
            s.state = ConversationState::Confirming;
            s.task.title = Some("Run".to_string());
        });

        let session = store.get_or_create(&key("+1"));
        assert_eq!(session.state, ConversationState::Confirming);
        assert_eq!(session.task.title.as_deref(), Some("Run"));
    }

    #[test]
    fn clear_then_fetch_yields_fresh_idle_session() {
        let store = SessionStore::new();
        store.update(&key("+1"), |s| {
            s.state = ConversationState::Confirming;
            s.task.title = Some("Run".to_string());
        });

        store.clear(&key("+1"));

        let session = store.get_or_create(&key("+1"));
        assert_eq!(session.state, ConversationState::Idle);
        assert!(session.task.title.is_none());
    }

    #[test]
    fn cleanup_evicts_only_stale_sessions() {
        let store = SessionStore::new();
        store.get_or_create(&key("+fresh"));
        store.get_or_create(&key("+stale"));
        // update() bumps updated_at, so backdate directly.
        {
            let mut sessions = store.sessions.write().unwrap();
            sessions.get_mut(&key("+stale")).unwrap().updated_at =
                Utc::now() - Duration::hours(30);
        }

        let evicted = store.cleanup_expired(24.0);
        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn turn_lock_is_shared_per_user() {
        let store = SessionStore::new();
        let a = store.turn_lock(&key("+1"));
        let b = store.turn_lock(&key("+1"));
        assert!(Arc::ptr_eq(&a, &b));

        let other = store.turn_lock(&key("+2"));
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
