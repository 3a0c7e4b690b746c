//! The inbound message webhook.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use copper_almanac_core::UserKey;
use copper_almanac_dialogue::DialogueEngine;
use copper_almanac_integration::Messenger;
use serde::Deserialize;
use std::sync::Arc;

const MEDIA_UNSUPPORTED: &str =
    "I can help you schedule tasks, but I can't process media files yet. Please send me \
     a text message describing what you'd like to schedule! \u{1F60A}";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub engine: DialogueEngine,
    pub messenger: Arc<dyn Messenger>,
}

/// The Twilio-style form payload of an inbound message.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "MessageSid", default)]
    pub message_sid: String,
    #[serde(rename = "NumMedia", default)]
    pub num_media: String,
}

/// Handles one inbound WhatsApp message.
///
/// Processed messages acknowledge with 200 regardless of content; 500
/// is reserved for reply delivery failure.
pub async fn whatsapp(
    State(state): State<AppState>,
    Form(inbound): Form<InboundMessage>,
) -> (StatusCode, &'static str) {
    let user = UserKey::from_raw(&inbound.from);
    tracing::info!(%user, message_sid = %inbound.message_sid, "webhook received");

    if inbound.num_media.parse::<u32>().is_ok_and(|n| n > 0) {
        tracing::info!(%user, "media message, sending canned reply");
        state.messenger.send_message(&user, MEDIA_UNSUPPORTED).await;
        return (StatusCode::OK, "OK");
    }

    if inbound.body.trim().is_empty() {
        tracing::warn!(%user, "empty message body");
        return (StatusCode::OK, "OK");
    }

    let reply = state.engine.handle_inbound_message(&user, &inbound.body).await;

    if state.messenger.send_message(&user, &reply).await {
        (StatusCode::OK, "OK")
    } else {
        tracing::error!(%user, "failed to deliver reply");
        (StatusCode::INTERNAL_SERVER_ERROR, "Error sending response")
    }
}
