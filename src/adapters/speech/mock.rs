//! Scripted speech adapter for tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};
use crate::ports::{SpeechError, SpeechRecognizer, SpeechSynthesizer};

/// Returns a fixed transcript and a fixed PCM buffer, or a fixed error.
#[derive(Debug)]
pub struct MockSpeech {
    transcript: Result<String, SpeechError>,
    pcm: Result<Vec<u8>, SpeechError>,
    delay: Duration,
    recognized: Mutex<usize>,
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            transcript: Err(SpeechError::NoSpeech),
            pcm: Err(SpeechError::service("speech synthesis is not configured")),
            delay: Duration::ZERO,
            recognized: Mutex::new(0),
        }
    }

    pub fn with_transcript(mut self, text: impl Into<String>) -> Self {
        self.transcript = Ok(text.into());
        self
    }

    pub fn with_recognition_error(mut self, error: SpeechError) -> Self {
        self.transcript = Err(error);
        self
    }

    pub fn with_pcm(mut self, pcm: Vec<u8>) -> Self {
        self.pcm = Ok(pcm);
        self
    }

    /// Delays recognition, for cancellation tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of recognitions that ran to completion.
    pub fn recognized_count(&self) -> usize {
        *self.recognized.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SpeechRecognizer for MockSpeech {
    async fn recognize(&self, _clip: &AudioClip, locale: Locale) -> Result<Transcript, SpeechError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        *self.recognized.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.transcript.clone().map(|text| Transcript { text, locale })
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
        self.pcm.clone()
    }
}
