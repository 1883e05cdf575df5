//! HTTP DTOs for voice endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{TranscribeCommand, VoiceChatResult};
use crate::domain::flows::ChatResponse;
use crate::domain::locale::Locale;
use crate::domain::speech::Transcript;

/// One recorded clip, base64-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceRequest {
    pub audio_base64: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub language: Locale,
}

fn default_mime_type() -> String {
    "audio/webm".to_string()
}

impl From<VoiceRequest> for TranscribeCommand {
    fn from(req: VoiceRequest) -> Self {
        Self {
            audio_base64: req.audio_base64,
            mime_type: req.mime_type,
            language: req.language,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub language: Locale,
}

impl From<Transcript> for TranscriptResponse {
    fn from(transcript: Transcript) -> Self {
        Self {
            transcript: transcript.text,
            language: transcript.locale,
        }
    }
}

/// Chat envelope plus the text that was heard.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceChatResponse {
    pub transcript: String,
    pub data: ChatResponse,
    pub fallback: bool,
}

impl From<VoiceChatResult> for VoiceChatResponse {
    fn from(result: VoiceChatResult) -> Self {
        Self {
            transcript: result.transcript.text,
            data: result.chat.data,
            fallback: result.chat.fallback,
        }
    }
}
