//! HTTP routes for voice endpoints.

use axum::{routing::post, Router};

use super::handlers::{transcribe, voice_chat, VoiceHandlers};

/// Creates the voice router, mounted under `/api/voice`.
pub fn voice_routes(handlers: VoiceHandlers) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/chat", post(voice_chat))
        .with_state(handlers)
}
