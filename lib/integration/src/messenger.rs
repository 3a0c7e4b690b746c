//! Outbound messaging collaborator.
//!
//! Delivery is best-effort: failures are logged and reported as a
//! boolean so a dropped reply never takes the conversation down.

use async_trait::async_trait;
use copper_almanac_core::UserKey;
use serde::Deserialize;
use std::time::Duration;

/// WhatsApp's outbound message length ceiling.
const MAX_MESSAGE_LENGTH: usize = 1600;
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound message delivery.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a message, returning whether delivery was accepted.
    async fn send_message(&self, to: &UserKey, body: &str) -> bool;
}

/// Configuration for the Twilio WhatsApp backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub whatsapp_number: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.twilio.com".to_string()
}

/// A `Messenger` backed by the Twilio messages API.
#[derive(Debug, Clone)]
pub struct TwilioMessenger {
    http: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioMessenger {
    /// Builds the backend, validating credentials and the HTTP client.
    pub fn new(config: TwilioConfig) -> Option<Self> {
        if config.account_sid.trim().is_empty() || config.auth_token.trim().is_empty() {
            tracing::error!("messaging credentials not configured");
            return None;
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .ok()?;
        Some(Self { http, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url, self.config.account_sid
        )
    }
}

/// Ensures a transport address carries the `whatsapp:` prefix.
#[must_use]
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_MESSAGE_LENGTH {
        return body.to_string();
    }
    tracing::warn!("outbound message truncated");
    let head: String = body.chars().take(MAX_MESSAGE_LENGTH - 3).collect();
    format!("{head}...")
}

#[async_trait]
impl Messenger for TwilioMessenger {
    async fn send_message(&self, to: &UserKey, body: &str) -> bool {
        let to = whatsapp_address(to.as_str());
        let body = truncate(body);
        let form = [
            ("From", self.config.whatsapp_number.as_str()),
            ("To", to.as_str()),
            ("Body", body.as_str()),
        ];

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .http
                .post(self.messages_url())
                .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
                .form(&form)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(%to, "message sent");
                    return true;
                }
                Ok(response) => {
                    let status = response.status();
                    // Bad request and not found are not retryable.
                    if status == reqwest::StatusCode::BAD_REQUEST
                        || status == reqwest::StatusCode::NOT_FOUND
                    {
                        tracing::error!(%to, %status, "message rejected");
                        return false;
                    }
                    tracing::warn!(%to, %status, attempt, "message attempt failed");
                }
                Err(e) => {
                    tracing::warn!(%to, error = %e, attempt, "message attempt failed");
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }
        }

        false
    }
}
