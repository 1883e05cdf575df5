//! HTTP handlers for voice endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    FlowContext, TranscribeCommand, TranscribeHandler, VoiceChatHandler,
};

use super::dto::{TranscriptResponse, VoiceChatResponse, VoiceRequest};

#[derive(Clone)]
pub struct VoiceHandlers {
    pub transcribe: Arc<TranscribeHandler>,
    pub chat: Arc<VoiceChatHandler>,
    /// Pending recognitions are cancelled after this long.
    pub recognition_timeout: Duration,
}

/// Cancel signal that fires once `timeout` elapses. The timer is aborted
/// when the guard drops.
struct Deadline {
    receiver: watch::Receiver<bool>,
    timer: JoinHandle<()>,
}

impl Deadline {
    fn start(timeout: Duration) -> Self {
        let (sender, receiver) = watch::channel(false);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = sender.send(true);
        });
        Self { receiver, timer }
    }

    fn signal(&self) -> watch::Receiver<bool> {
        self.receiver.clone()
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// POST /api/voice/transcribe
pub async fn transcribe(
    State(handlers): State<VoiceHandlers>,
    RequireAuth(_user): RequireAuth,
    body: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Json(req) = body?;
    let cmd = TranscribeCommand::from(req);

    let deadline = Deadline::start(handlers.recognition_timeout);
    let transcript = handlers.transcribe.handle(&cmd, deadline.signal()).await?;

    Ok(Json(transcript.into()))
}

/// POST /api/voice/chat
pub async fn voice_chat(
    State(handlers): State<VoiceHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<Json<VoiceChatResponse>, ApiError> {
    let Json(req) = body?;
    let cmd = TranscribeCommand::from(req);

    let deadline = Deadline::start(handlers.recognition_timeout);
    let result = handlers
        .chat
        .handle(&cmd, &FlowContext::new(user.id), deadline.signal())
        .await?;

    Ok(Json(result.into()))
}
