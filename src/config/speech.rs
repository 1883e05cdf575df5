//! Speech service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// OpenAI-compatible transcription and speech endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// API key; falls back to `ai.openai_api_key`. Without either, voice
    /// input reports no speech and read-aloud is unavailable.
    pub api_key: Option<String>,

    pub base_url: Option<String>,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    /// Per-call HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Deadline after which a pending recognition is cancelled
    #[serde(default = "default_recognition_timeout")]
    pub recognition_timeout_secs: u64,
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_secs(self.recognition_timeout_secs)
    }

    /// Key to use, preferring the speech-specific one.
    pub fn resolve_api_key<'a>(&'a self, openai_api_key: Option<&'a str>) -> Option<&'a str> {
        self.api_key
            .as_deref()
            .or(openai_api_key)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.recognition_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.transcription_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SPEECH__TRANSCRIPTION_MODEL"));
        }
        if self.speech_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SPEECH__SPEECH_MODEL"));
        }
        Ok(())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            transcription_model: default_transcription_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            timeout_secs: default_timeout(),
            recognition_timeout_secs: default_recognition_timeout(),
        }
    }
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_recognition_timeout() -> u64 {
    30
}
