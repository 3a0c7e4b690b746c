mod config;
mod fallback;
mod webhook;

use crate::config::ServerConfig;
use crate::fallback::{UnavailableCalendar, UnavailableMessenger, UnavailableModel};
use crate::webhook::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::FixedOffset;
use copper_almanac_ai::{LanguageModel, OpenAiChatModel};
use copper_almanac_dialogue::DialogueEngine;
use copper_almanac_integration::{
    Calendar, GoogleCalendar, Messenger, SlidingWindowConfig, SlidingWindowLimiter,
    TwilioMessenger,
};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let tz: FixedOffset = config
        .timezone
        .parse()
        .expect("invalid timezone offset, expected e.g. +05:30");

    let model: Arc<dyn LanguageModel> = match config.openai.map(OpenAiChatModel::new) {
        Some(Ok(model)) => Arc::new(model),
        Some(Err(e)) => {
            tracing::error!(error = %e, "language model unavailable");
            Arc::new(UnavailableModel)
        }
        None => {
            tracing::error!("language model not configured");
            Arc::new(UnavailableModel)
        }
    };

    let calendar: Arc<dyn Calendar> = match config.calendar.map(|c| GoogleCalendar::new(c, tz)) {
        Some(Ok(calendar)) => Arc::new(calendar),
        Some(Err(e)) => {
            tracing::error!(error = %e, "calendar unavailable");
            Arc::new(UnavailableCalendar)
        }
        None => {
            tracing::error!("calendar not configured");
            Arc::new(UnavailableCalendar)
        }
    };

    let messenger: Arc<dyn Messenger> = match config.twilio.and_then(TwilioMessenger::new) {
        Some(messenger) => Arc::new(messenger),
        None => {
            tracing::error!("messaging not configured");
            Arc::new(UnavailableMessenger)
        }
    };

    let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(
        config.rate_limit.max_requests,
        config.rate_limit.window_seconds,
    ));
    let engine = DialogueEngine::new(model, calendar, limiter);

    // Spawn periodic session eviction task
    let cleanup_engine = engine.clone();
    let max_age_hours = config.session.max_age_hours;
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let evicted = cleanup_engine.cleanup_expired_sessions(max_age_hours);
            if evicted > 0 {
                tracing::debug!(evicted, "periodic session cleanup");
            }
        }
    });

    let state = AppState { engine, messenger };
    let app = Router::new()
        .route("/health", get(health))
        .route("/webhook/whatsapp", post(webhook::whatsapp))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "healthy"}))
}
