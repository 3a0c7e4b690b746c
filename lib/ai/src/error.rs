//! Error types for the AI crate.

use std::fmt;

/// Errors from language-model backend operations.
///
/// None of these reach end users: the dialogue engine treats a failed
/// call the same as "field undetermined" and degrades to a follow-up or
/// apology reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Backend was never initialized (missing or placeholder credentials).
    Unavailable { reason: String },
    /// Request failed after retries.
    RequestFailed { reason: String },
    /// Response body could not be read or decoded.
    ResponseParseFailed { reason: String },
    /// Authentication was rejected; retrying cannot help.
    AuthenticationFailed,
    /// Provider rate limit hit; retrying immediately cannot help.
    RateLimited,
    /// Invalid backend configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => {
                write!(f, "language model unavailable: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "language model request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse language model response: {reason}")
            }
            Self::AuthenticationFailed => write!(f, "language model authentication failed"),
            Self::RateLimited => write!(f, "language model rate limited"),
            Self::InvalidConfig { reason } => {
                write!(f, "invalid language model configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}
