//! Core domain types and error handling for the copper-almanac platform.
//!
//! This crate provides:
//!
//! - **Keys**: `UserKey` and `EventId` newtypes used across all services
//! - **Task data**: the slot-filling task model and required-field logic
//! - **Stored events**: the per-user record of recently created events
//! - **Edit intents**: the structured result of edit-request analysis
//! - **Result**: the `rootcause`-based `Result` alias

pub mod edit;
pub mod error;
pub mod event;
pub mod key;
pub mod task;

pub use edit::{EditFields, EditIntent, EditKind, EventUpdates};
pub use error::Result;
pub use event::StoredEvent;
pub use key::{EventId, UserKey};
pub use task::{ExtractedFields, RequiredField, TaskData};
