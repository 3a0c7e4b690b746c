//! Conversation state for the copper-almanac platform.
//!
//! This crate provides:
//!
//! - **Sessions**: per-user dialogue state and collected task data
//! - **Session Store**: the process-wide session registry with idle
//!   eviction and per-user turn serialization
//! - **Event Log**: bounded, newest-first history of created events

pub mod events;
pub mod session;
pub mod store;

pub use events::{EventLog, DEFAULT_RECENT_LIMIT, MAX_EVENTS_PER_USER};
pub use session::{ConversationSession, ConversationState};
pub use store::SessionStore;
