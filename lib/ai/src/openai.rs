//! OpenAI-compatible chat-completions backend.
//!
//! Construction takes a bounded set of options (credential, base URL,
//! model, sampling parameters, timeout). If construction fails the
//! caller marks the collaborator unavailable; nothing here panics or
//! retries construction.

use crate::analysis::{QueryAnalysis, RecentEventSummary, TaskAnalysis};
use crate::decode::decode_lenient;
use crate::error::LlmError;
use crate::model::LanguageModel;
use crate::prompt;
use async_trait::async_trait;
use copper_almanac_core::{EditIntent, ExtractedFields, TaskData};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the chat-completions backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key. Placeholder values ("your_...") are rejected at
    /// construction.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Token budget per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,
    /// Nucleus sampling parameter.
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_top_p() -> f32 {
    0.2
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// A `LanguageModel` backed by an OpenAI-compatible chat-completions
/// endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiChatModel {
    /// Builds the backend, validating the credential and HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the API key is absent or a placeholder, or
    /// when the HTTP client cannot be constructed.
    pub fn new(config: OpenAiConfig) -> copper_almanac_core::Result<Self, LlmError> {
        if config.api_key.trim().is_empty() || config.api_key.to_lowercase().contains("your_") {
            return Err(LlmError::InvalidConfig {
                reason: "API key not configured".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    /// Sends one completion request with bounded retries.
    ///
    /// Authentication and rate-limit rejections are terminal; other
    /// failures retry with linear backoff.
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
        };

        let mut last_error = LlmError::RequestFailed {
            reason: "no attempts made".to_string(),
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(LlmError::AuthenticationFailed);
                    }
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(LlmError::RateLimited);
                    }
                    if status.is_success() {
                        let body: ChatResponse =
                            response
                                .json()
                                .await
                                .map_err(|e| LlmError::ResponseParseFailed {
                                    reason: e.to_string(),
                                })?;
                        let content = body
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .unwrap_or_default();
                        return Ok(content.trim().to_string());
                    }
                    last_error = LlmError::RequestFailed {
                        reason: format!("status {status}"),
                    };
                }
                Err(e) => {
                    last_error = LlmError::RequestFailed {
                        reason: e.to_string(),
                    };
                }
            }

            tracing::warn!(attempt, error = %last_error, "model request attempt failed");
            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn analyze_task(&self, message: &str) -> Result<TaskAnalysis, LlmError> {
        let content = self
            .complete(prompt::ANALYZE_TASK, &format!("Analyze: '{message}'"))
            .await?;
        Ok(decode_lenient(&content, TaskAnalysis::not_a_task()))
    }

    async fn analyze_edit(
        &self,
        message: &str,
        recent_events: &[RecentEventSummary],
    ) -> Result<EditIntent, LlmError> {
        let system = prompt::analyze_edit(recent_events);
        let content = self
            .complete(&system, &format!("Analyze: '{message}'"))
            .await?;
        Ok(decode_lenient(&content, EditIntent::not_an_edit()))
    }

    async fn analyze_query(&self, message: &str) -> Result<QueryAnalysis, LlmError> {
        let content = self
            .complete(prompt::ANALYZE_QUERY, &format!("Analyze: '{message}'"))
            .await?;
        Ok(decode_lenient(&content, QueryAnalysis::not_a_query()))
    }

    async fn parse_reply(
        &self,
        message: &str,
        context: &str,
    ) -> Result<ExtractedFields, LlmError> {
        let system = prompt::parse_reply(context);
        let content = self.complete(&system, message).await?;
        Ok(decode_lenient(&content, ExtractedFields::default()))
    }

    async fn parse_confirmation_edit(
        &self,
        message: &str,
        task: &TaskData,
    ) -> Result<ExtractedFields, LlmError> {
        let system = prompt::parse_confirmation_edit(task);
        let content = self.complete(&system, message).await?;
        Ok(decode_lenient(&content, ExtractedFields::default()))
    }
}
