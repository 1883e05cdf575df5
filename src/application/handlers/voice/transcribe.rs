//! Transcribe and VoiceChat - Command handlers for spoken input.

use std::sync::Arc;

use tokio::sync::watch;

use super::recognize::recognize_once;
use super::VoiceError;
use crate::application::handlers::flows::{ChatHandler, FlowContext, FlowOutcome};
use crate::domain::flows::{ChatInput, ChatResponse};
use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};
use crate::ports::SpeechRecognizer;

/// Command carrying one recorded clip.
#[derive(Debug, Clone)]
pub struct TranscribeCommand {
    pub audio_base64: String,
    pub mime_type: String,
    pub language: Locale,
}

/// Handler turning a clip into text.
pub struct TranscribeHandler {
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl TranscribeHandler {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self { recognizer }
    }

    pub async fn handle(
        &self,
        cmd: &TranscribeCommand,
        cancel: watch::Receiver<bool>,
    ) -> Result<Transcript, VoiceError> {
        let clip = AudioClip::from_base64(&cmd.audio_base64, &cmd.mime_type)?;

        let result = recognize_once(self.recognizer.as_ref(), &clip, cmd.language, cancel).await;
        match &result {
            Ok(transcript) => tracing::info!(
                language = cmd.language.code(),
                chars = transcript.text.chars().count(),
                "Transcription finished"
            ),
            Err(VoiceError::Cancelled) => tracing::info!("Transcription cancelled"),
            Err(e) => tracing::warn!(error = %e, "Transcription failed"),
        }
        result
    }
}

/// Transcript plus the chatbot's answer to it.
#[derive(Debug, Clone)]
pub struct VoiceChatResult {
    pub transcript: Transcript,
    pub chat: FlowOutcome<ChatResponse>,
}

/// Handler that transcribes a clip and forwards the text to the chatbot.
pub struct VoiceChatHandler {
    transcriber: TranscribeHandler,
    chat: Arc<ChatHandler>,
}

impl VoiceChatHandler {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, chat: Arc<ChatHandler>) -> Self {
        Self {
            transcriber: TranscribeHandler::new(recognizer),
            chat,
        }
    }

    pub async fn handle(
        &self,
        cmd: &TranscribeCommand,
        ctx: &FlowContext,
        cancel: watch::Receiver<bool>,
    ) -> Result<VoiceChatResult, VoiceError> {
        let transcript = self.transcriber.handle(cmd, cancel).await?;

        let input = ChatInput {
            query: transcript.text.clone(),
            language: cmd.language,
        };
        let chat = self.chat.reply(&input, ctx).await;

        Ok(VoiceChatResult { transcript, chat })
    }
}
