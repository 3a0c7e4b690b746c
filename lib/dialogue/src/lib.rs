//! Conversation orchestration for the copper-almanac platform.
//!
//! This crate provides:
//!
//! - **Engine**: `DialogueEngine`, the single entry point that turns an
//!   inbound message into a reply while advancing the user's session
//! - **Edit resolution**: mapping an edit request onto one of the
//!   user's recent events
//! - **Replies**: the canned and templated texts users see

pub mod edit;
pub mod engine;
pub mod reply;

pub use edit::EventEditResolver;
pub use engine::DialogueEngine;
