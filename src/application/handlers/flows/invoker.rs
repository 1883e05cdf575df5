//! FlowInvoker - shared plumbing for model-backed flows.
//!
//! Every flow validates its request body, renders a prompt, asks the model
//! for one JSON object matching an output schema, and checks the reply
//! against that schema before deserializing it. Failures on the model side
//! come back as [`FlowError::Upstream`] so handlers can substitute their
//! fallback; only [`FlowError::InvalidInput`] reaches the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::flows::{FlowSchema, PhotoDataUri};
use crate::domain::foundation::UserId;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FlowSchemaValidator, Message, RequestMetadata,
    SchemaValidationError, SpeechError,
};

const SYSTEM_PREAMBLE: &str = "You are KrishiMitra, an assistant for Indian farmers. \
Reply with exactly one JSON object that conforms to the following JSON Schema. \
Do not add commentary or code fences.";

/// Errors a flow can produce.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The request body does not match the flow's input schema.
    #[error("invalid input: {0}")]
    InvalidInput(SchemaValidationError),

    /// A hosted service failed or returned something unusable.
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamError),
}

impl FlowError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FlowError::InvalidInput(_))
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("model call failed: {0}")]
    Provider(#[from] AIError),

    #[error("model returned no JSON object")]
    EmptyOutput,

    #[error("model output is not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("model output does not match {schema}: {error}")]
    SchemaMismatch {
        schema: FlowSchema,
        error: SchemaValidationError,
    },

    /// Post-processing left nothing worth returning.
    #[error("model output unusable: {0}")]
    Unusable(String),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

/// Flow result plus whether it is the static fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutcome<T> {
    pub data: T,
    pub fallback: bool,
}

impl<T> FlowOutcome<T> {
    pub fn generated(data: T) -> Self {
        Self {
            data,
            fallback: false,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            fallback: true,
        }
    }
}

/// Who is asking, for request metadata and log correlation.
#[derive(Debug, Clone)]
pub struct FlowContext {
    pub user_id: UserId,
    pub trace_id: String,
}

impl FlowContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

/// One model call within a flow.
#[derive(Debug, Clone)]
pub struct GenerationStep<'a> {
    /// Operation name used in logs and request metadata.
    pub operation: &'a str,
    pub prompt: String,
    pub output: FlowSchema,
    pub image: Option<&'a PhotoDataUri>,
    pub temperature: Option<f32>,
}

impl<'a> GenerationStep<'a> {
    pub fn new(operation: &'a str, prompt: String, output: FlowSchema) -> Self {
        Self {
            operation,
            prompt,
            output,
            image: None,
            temperature: None,
        }
    }

    pub fn with_image(mut self, image: Option<&'a PhotoDataUri>) -> Self {
        self.image = image;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Validates payloads and performs schema-constrained generations.
pub struct FlowInvoker {
    provider: Arc<dyn AIProvider>,
    validator: Arc<dyn FlowSchemaValidator>,
}

impl FlowInvoker {
    pub fn new(provider: Arc<dyn AIProvider>, validator: Arc<dyn FlowSchemaValidator>) -> Self {
        Self {
            provider,
            validator,
        }
    }

    /// Checks `payload` against an input schema, then deserializes it.
    pub fn parse_input<T: DeserializeOwned>(
        &self,
        schema: FlowSchema,
        payload: &Value,
    ) -> Result<T, FlowError> {
        self.validator
            .validate(schema, payload)
            .map_err(FlowError::InvalidInput)?;

        serde_json::from_value(payload.clone()).map_err(|e| {
            FlowError::InvalidInput(SchemaValidationError::Generic {
                message: e.to_string(),
            })
        })
    }

    /// Runs one generation and returns the typed, schema-checked reply.
    pub async fn generate<T: DeserializeOwned>(
        &self,
        ctx: &FlowContext,
        step: GenerationStep<'_>,
    ) -> Result<T, FlowError> {
        let schema = self.validator.schema_for(step.output);
        let system_prompt = format!("{}\n\n{}", SYSTEM_PREAMBLE, schema);

        let mut message = Message::user(step.prompt);
        if let Some(image) = step.image {
            message = message.with_image(image.mime_type(), image.data());
        }

        let mut request = CompletionRequest::new(RequestMetadata::new(
            ctx.user_id.clone(),
            step.operation,
            ctx.trace_id.clone(),
        ))
        .with_system_prompt(system_prompt)
        .with_message(message)
        .with_json_output();
        if let Some(temperature) = step.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(UpstreamError::from)?;

        tracing::debug!(
            operation = step.operation,
            trace_id = %ctx.trace_id,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Model call completed"
        );

        let raw = extract_json_object(&response.content).ok_or(UpstreamError::EmptyOutput)?;
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| UpstreamError::MalformedOutput(e.to_string()))?;

        self.validator
            .validate(step.output, &value)
            .map_err(|error| UpstreamError::SchemaMismatch {
                schema: step.output,
                error,
            })?;

        serde_json::from_value(value)
            .map_err(|e| UpstreamError::MalformedOutput(e.to_string()).into())
    }
}

/// Finds the first balanced `{...}` in model output, skipping code fences
/// and prose around it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
