//! Language-model collaborator for the copper-almanac platform.
//!
//! This crate provides:
//!
//! - **Contract**: the `LanguageModel` trait the dialogue engine calls
//! - **Analysis types**: structured results for task, edit, and query
//!   classification
//! - **Decode pipeline**: tolerant JSON extraction from free-text model
//!   output
//! - **Backend**: an OpenAI-compatible chat-completions client

pub mod analysis;
pub mod decode;
pub mod error;
pub mod model;
pub mod openai;
mod prompt;

pub use analysis::{QueryAnalysis, RecentEventSummary, TaskAnalysis};
pub use decode::decode_lenient;
pub use error::LlmError;
pub use model::{LanguageModel, EDIT_CONTEXT_EVENTS};
pub use openai::{OpenAiChatModel, OpenAiConfig};
