//! Speech adapter used when no speech API key is configured.

use async_trait::async_trait;

use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};
use crate::ports::{SpeechError, SpeechRecognizer, SpeechSynthesizer};

/// Fails every request as a service outage.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSpeech;

impl UnconfiguredSpeech {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechRecognizer for UnconfiguredSpeech {
    async fn recognize(&self, _clip: &AudioClip, _locale: Locale) -> Result<Transcript, SpeechError> {
        Err(SpeechError::service("speech recognition is not configured"))
    }
}

#[async_trait]
impl SpeechSynthesizer for UnconfiguredSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
        Err(SpeechError::service("speech synthesis is not configured"))
    }
}
