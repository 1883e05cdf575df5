//! TextToSpeechHandler - speaks text back as a WAV data URI.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, UpstreamError};
use crate::domain::flows::FlowSchema;
use crate::domain::speech::{SpeechAudio, SpeechInput};
use crate::ports::{FlowSchemaValidator, SchemaValidationError, SpeechSynthesizer};

pub struct TextToSpeechHandler {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    validator: Arc<dyn FlowSchemaValidator>,
}

impl TextToSpeechHandler {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        validator: Arc<dyn FlowSchemaValidator>,
    ) -> Self {
        Self {
            synthesizer,
            validator,
        }
    }

    /// Synthesis failures surface as [`FlowError::Upstream`]; audio has no
    /// meaningful fallback.
    pub async fn handle(&self, payload: &Value, ctx: &FlowContext) -> Result<SpeechAudio, FlowError> {
        self.validator
            .validate(FlowSchema::SpeechInput, payload)
            .map_err(FlowError::InvalidInput)?;
        let input: SpeechInput = serde_json::from_value(payload.clone()).map_err(|e| {
            FlowError::InvalidInput(SchemaValidationError::Generic {
                message: e.to_string(),
            })
        })?;

        let pcm = self
            .synthesizer
            .synthesize(input.text.trim())
            .await
            .map_err(|e| {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Speech synthesis failed");
                UpstreamError::from(e)
            })?;

        tracing::info!(trace_id = %ctx.trace_id, pcm_bytes = pcm.len(), "Speech synthesized");
        Ok(SpeechAudio::from_pcm(&pcm))
    }
}
