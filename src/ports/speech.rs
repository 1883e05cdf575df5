//! Speech ports: recognition of recorded clips and text-to-speech synthesis.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};

/// Turns one recorded clip into one final transcript.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, clip: &AudioClip, locale: Locale) -> Result<Transcript, SpeechError>;
}

/// Synthesizes speech as raw 16-bit little-endian mono PCM at 24 kHz.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The clip contained no recognizable speech.
    #[error("no speech detected")]
    NoSpeech,

    /// The audio format or language is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The speech service failed or could not be reached.
    #[error("speech service error: {0}")]
    Service(String),
}

impl SpeechError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }
}
