//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Each
//! collaborator section is optional; a missing section leaves that
//! collaborator unavailable rather than failing startup.

use copper_almanac_ai::OpenAiConfig;
use copper_almanac_integration::{GoogleCalendarConfig, TwilioConfig};
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Fixed UTC offset all free-text dates resolve in, e.g. `+05:30`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Session eviction tuning.
    #[serde(default)]
    pub session: SessionConfig,

    /// Inbound rate-limit tuning.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Language-model collaborator settings.
    pub openai: Option<OpenAiConfig>,

    /// Calendar collaborator settings.
    pub calendar: Option<GoogleCalendarConfig>,

    /// Messaging collaborator settings.
    pub twilio: Option<TwilioConfig>,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions idle longer than this are evicted.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: f64,

    /// Interval between eviction sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timezone() -> String {
    "+00:00".to_string()
}

fn default_max_age_hours() -> f64 {
    24.0
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

/// Inbound message rate limiting.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_seconds")]
    pub window_seconds: u32,
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_seconds() -> u32 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
