//! OpenAI-compatible speech adapter.
//!
//! Recognition posts the clip to `/audio/transcriptions` as multipart form
//! data; synthesis asks `/audio/speech` for raw `pcm`, which that API emits
//! as 16-bit little-endian mono at 24 kHz.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};
use crate::ports::{SpeechError, SpeechRecognizer, SpeechSynthesizer};

#[derive(Debug, Clone)]
pub struct OpenAISpeechConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub transcription_model: String,
    pub speech_model: String,
    pub voice: String,
    pub timeout: Duration,
}

impl OpenAISpeechConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            transcription_model: "whisper-1".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Implements both speech ports against one API key.
pub struct OpenAISpeech {
    config: OpenAISpeechConfig,
    client: Client,
}

impl OpenAISpeech {
    pub fn new(config: OpenAISpeechConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key.expose_secret())
    }

    /// ISO-639-1 hint for the transcription model (`hi-IN` -> `hi`).
    fn language_hint(locale: Locale) -> &'static str {
        let tag = locale.speech_tag();
        tag.split('-').next().unwrap_or(tag)
    }

    async fn check_status(response: Response) -> Result<Response, SpeechError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Speech API returned an error");
        match status.as_u16() {
            400 | 415 => Err(SpeechError::Unsupported(body)),
            _ => Err(SpeechError::service(format!("status {}: {}", status, body))),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for OpenAISpeech {
    async fn recognize(&self, clip: &AudioClip, locale: Locale) -> Result<Transcript, SpeechError> {
        let file = Part::bytes(clip.bytes.clone())
            .file_name(format!("clip.{}", clip.file_extension()))
            .mime_str(&clip.mime_type)
            .map_err(|_| SpeechError::Unsupported(clip.mime_type.clone()))?;

        let form = Form::new()
            .part("file", file)
            .text("model", self.config.transcription_model.clone())
            .text("language", Self::language_hint(locale))
            .text("response_format", "json");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .header("Authorization", self.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;

        let body: TranscriptionResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SpeechError::service(format!("Failed to parse transcription: {}", e)))?;

        let text = body.text.trim();
        if text.is_empty() {
            return Err(SpeechError::NoSpeech);
        }

        Ok(Transcript {
            text: text.to_string(),
            locale,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let request = SpeechRequest {
            model: &self.config.speech_model,
            input: text,
            voice: &self.config.voice,
            response_format: "pcm",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url))
            .header("Authorization", self.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;

        let pcm = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;

        if pcm.is_empty() {
            return Err(SpeechError::service("empty audio stream"));
        }
        Ok(pcm.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn speech_for(server: &MockServer) -> OpenAISpeech {
        OpenAISpeech::new(OpenAISpeechConfig::new("test-key").with_base_url(server.base_url()))
    }

    fn clip() -> AudioClip {
        AudioClip {
            bytes: vec![1, 2, 3, 4],
            mime_type: "audio/webm".to_string(),
        }
    }

    #[test]
    fn language_hint_strips_region() {
        assert_eq!(OpenAISpeech::language_hint(Locale::Kn), "kn");
        assert_eq!(OpenAISpeech::language_hint(Locale::Bho), "hi");
        assert_eq!(OpenAISpeech::language_hint(Locale::En), "en");
    }

    #[tokio::test]
    async fn recognize_returns_trimmed_transcript() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/audio/transcriptions")
                    .header("authorization", "Bearer test-key")
                    .body_contains("whisper-1");
                then.status(200).json_body(json!({ "text": "  pyaaz ka bhav kya hai  " }));
            })
            .await;

        let transcript = speech_for(&server).recognize(&clip(), Locale::Hi).await.unwrap();

        mock.assert_async().await;
        assert_eq!(transcript.text, "pyaaz ka bhav kya hai");
        assert_eq!(transcript.locale, Locale::Hi);
    }

    #[tokio::test]
    async fn blank_transcript_is_no_speech() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/audio/transcriptions");
                then.status(200).json_body(json!({ "text": "" }));
            })
            .await;

        let err = speech_for(&server).recognize(&clip(), Locale::En).await.unwrap_err();
        assert_eq!(err, SpeechError::NoSpeech);
    }

    #[tokio::test]
    async fn bad_request_is_unsupported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/audio/transcriptions");
                then.status(400).body("Invalid file format");
            })
            .await;

        let err = speech_for(&server).recognize(&clip(), Locale::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported(_)));
    }

    #[tokio::test]
    async fn synthesize_requests_pcm() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/audio/speech")
                    .json_body(json!({
                        "model": "tts-1",
                        "input": "Namaste",
                        "voice": "alloy",
                        "response_format": "pcm"
                    }));
                then.status(200).body(vec![0u8, 1, 2, 3]);
            })
            .await;

        let pcm = speech_for(&server).synthesize("Namaste").await.unwrap();

        mock.assert_async().await;
        assert_eq!(pcm, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn synthesis_outage_is_service_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/audio/speech");
                then.status(503);
            })
            .await;

        let err = speech_for(&server).synthesize("Namaste").await.unwrap_err();
        assert!(matches!(err, SpeechError::Service(_)));
    }
}
