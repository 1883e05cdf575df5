//! JSON error bodies and the status mapping for every failure that can
//! leave an HTTP handler.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::application::handlers::{FlowError, UpstreamError, VoiceError};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::SpeechError;

/// Error body: `{ "code", "message", "details"? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An unexpected error occurred")
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Status plus body; what every handler returns on failure.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(rejection.body_text()),
        )
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidInput(error) => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(error.to_string())
                    .with_details(json!({ "error_count": error.error_count() })),
            ),
            FlowError::Upstream(UpstreamError::Speech(error)) => speech_unavailable(&error),
            FlowError::Upstream(error) => {
                tracing::error!(error = %error, "Upstream failure without fallback");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::unavailable("The assistant is temporarily unavailable"),
                )
            }
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidInput(error) => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::InvalidFormat, error.to_string())
                    .with_details(json!({ "field": error.field() })),
            ),
            VoiceError::Speech(SpeechError::NoSpeech) => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("NO_SPEECH", "No speech was detected in the recording"),
            ),
            VoiceError::Speech(SpeechError::Unsupported(reason)) => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("UNSUPPORTED_AUDIO", reason),
            ),
            VoiceError::Speech(error) => speech_unavailable(&error),
            VoiceError::Cancelled => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(ErrorCode::SpeechUnavailable, "Speech recognition timed out"),
            ),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::ProfileNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::AIProviderError
            | ErrorCode::SpeechUnavailable
            | ErrorCode::ServiceUnavailable
            | ErrorCode::DatabaseError => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(code = %err.code, error = %err.message, "Request failed");
            let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
                ErrorResponse::internal()
            } else {
                ErrorResponse::new(err.code, "A backing service is temporarily unavailable")
            };
            return ApiError::new(status, body);
        }

        let mut body = ErrorResponse::new(err.code, err.message);
        if !err.details.is_empty() {
            body = body.with_details(json!(err.details));
        }
        ApiError::new(status, body)
    }
}

fn speech_unavailable(error: &SpeechError) -> ApiError {
    tracing::error!(error = %error, "Speech service failure");
    ApiError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        ErrorResponse::new(ErrorCode::SpeechUnavailable, "Speech service is temporarily unavailable"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;
    use crate::ports::{AIError, SchemaValidationError};

    #[test]
    fn invalid_flow_input_is_400() {
        let err: ApiError = FlowError::InvalidInput(SchemaValidationError::MissingRequired {
            field: "query".to_string(),
        })
        .into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "VALIDATION_FAILED");
        assert!(err.body.message.contains("query"));
    }

    #[test]
    fn upstream_without_fallback_is_503() {
        let err: ApiError = FlowError::Upstream(UpstreamError::Provider(AIError::network("reset"))).into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError =
            FlowError::Upstream(UpstreamError::Speech(SpeechError::service("down"))).into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body.code, "SPEECH_UNAVAILABLE");
    }

    #[test]
    fn voice_errors_map_to_status() {
        let cases = [
            (VoiceError::InvalidInput(ValidationError::empty_field("audio_base64")), StatusCode::BAD_REQUEST),
            (VoiceError::Speech(SpeechError::NoSpeech), StatusCode::BAD_REQUEST),
            (VoiceError::Speech(SpeechError::Unsupported("flac".into())), StatusCode::BAD_REQUEST),
            (VoiceError::Speech(SpeechError::service("timeout")), StatusCode::SERVICE_UNAVAILABLE),
            (VoiceError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn database_error_hides_message() {
        let err: ApiError =
            DomainError::new(ErrorCode::DatabaseError, "password authentication failed").into();

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.body.message.contains("password"));
    }

    #[test]
    fn validation_domain_error_keeps_field_detail() {
        let err: ApiError = DomainError::from(ValidationError::empty_field("location")).into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.details.unwrap()["field"], "location");
    }

    #[test]
    fn details_are_omitted_when_empty() {
        let body = serde_json::to_value(ErrorResponse::unauthorized("Authentication required")).unwrap();
        assert!(body.get("details").is_none());
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
