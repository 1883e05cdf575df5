//! Router assembly: wires ports into handlers and mounts every endpoint.
//!
//! ```text
//! /health                 public
//! /api/flows/*            auth
//! /api/voice/*            auth
//! /api/profile            auth
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::flows::{flow_routes, FlowHandlers};
use super::middleware::auth_middleware;
use super::profile::{profile_routes, ProfileHandlers};
use super::voice::{voice_routes, VoiceHandlers};
use crate::application::handlers::{
    ArticleSummaryHandler, ChatHandler, CropDiagnosisHandler, CropRecommendationHandler,
    FlowInvoker, GetOrCreateProfileHandler, MarketAnalysisHandler, SchemeLookupHandler,
    TextToSpeechHandler, TranscribeHandler, UpdateProfileHandler, VideoSearchHandler,
    VoiceChatHandler, WeatherForecastHandler,
};
use crate::domain::profile::ProfileDefaults;
use crate::ports::{
    AIProvider, FlowSchemaValidator, ProfileStore, SessionValidator, SpeechRecognizer,
    SpeechSynthesizer,
};

/// Every outbound dependency the HTTP surface needs.
#[derive(Clone)]
pub struct Ports {
    pub ai: Arc<dyn AIProvider>,
    pub schemas: Arc<dyn FlowSchemaValidator>,
    pub sessions: Arc<dyn SessionValidator>,
    pub profiles: Arc<dyn ProfileStore>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Router-level settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub request_timeout: Duration,
    pub recognition_timeout: Duration,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
    pub profile_defaults: ProfileDefaults,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(90),
            recognition_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
            profile_defaults: ProfileDefaults::default(),
        }
    }
}

/// Builds the full application router.
pub fn build_router(ports: Ports, settings: RouterSettings) -> Router {
    let invoker = Arc::new(FlowInvoker::new(ports.ai.clone(), ports.schemas.clone()));
    let chat = Arc::new(ChatHandler::new(invoker.clone()));

    let flows = FlowHandlers {
        market_analysis: Arc::new(MarketAnalysisHandler::new(invoker.clone())),
        crop_diagnosis: Arc::new(CropDiagnosisHandler::new(invoker.clone())),
        crop_recommendation: Arc::new(CropRecommendationHandler::new(invoker.clone())),
        schemes: Arc::new(SchemeLookupHandler::new(invoker.clone())),
        weather: Arc::new(WeatherForecastHandler::new(invoker.clone())),
        videos: Arc::new(VideoSearchHandler::new(invoker.clone())),
        article_summary: Arc::new(ArticleSummaryHandler::new(invoker)),
        chat: chat.clone(),
        speech: Arc::new(TextToSpeechHandler::new(
            ports.synthesizer.clone(),
            ports.schemas.clone(),
        )),
    };

    let voice = VoiceHandlers {
        transcribe: Arc::new(TranscribeHandler::new(ports.recognizer.clone())),
        chat: Arc::new(VoiceChatHandler::new(ports.recognizer.clone(), chat)),
        recognition_timeout: settings.recognition_timeout,
    };

    let profile = ProfileHandlers::new(
        Arc::new(GetOrCreateProfileHandler::new(
            ports.profiles.clone(),
            settings.profile_defaults.clone(),
        )),
        Arc::new(UpdateProfileHandler::new(
            ports.profiles.clone(),
            settings.profile_defaults.clone(),
        )),
    );

    let api = Router::new()
        .nest("/flows", flow_routes(flows))
        .nest("/voice", voice_routes(voice))
        .nest("/profile", profile_routes(profile))
        .layer(middleware::from_fn_with_state(ports.sessions, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "krishi-mitra",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::profile::InMemoryProfileStore;
    use crate::adapters::speech::{MockSpeech, UnconfiguredSpeech};
    use crate::adapters::validation::JsonSchemaValidator;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let speech = Arc::new(MockSpeech::new());
        build_router(
            Ports {
                ai: Arc::new(MockAIProvider::new()),
                schemas: Arc::new(JsonSchemaValidator::new()),
                sessions: Arc::new(MockSessionValidator::new()),
                profiles: Arc::new(InMemoryProfileStore::new()),
                recognizer: speech.clone(),
                synthesizer: speech,
            },
            RouterSettings::default(),
        )
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_auth() {
        for (method, path) in [
            ("POST", "/api/flows/chat"),
            ("POST", "/api/voice/transcribe"),
            ("GET", "/api/profile"),
        ] {
            let response = router()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(path)
                        .header("content-type", "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);
        }
    }

    #[tokio::test]
    async fn keyless_speech_is_503_not_no_speech() {
        let speech = Arc::new(UnconfiguredSpeech::new());
        let app = build_router(
            Ports {
                ai: Arc::new(MockAIProvider::new()),
                schemas: Arc::new(JsonSchemaValidator::new()),
                sessions: Arc::new(MockSessionValidator::new().with_test_user("t", "farmer-1")),
                profiles: Arc::new(InMemoryProfileStore::new()),
                recognizer: speech.clone(),
                synthesizer: speech,
            },
            RouterSettings::default(),
        );

        let response = app
            .oneshot(
                Request::post("/api/voice/transcribe")
                    .header("authorization", "Bearer t")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"audio_base64":"aGVsbG8=","language":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "SPEECH_UNAVAILABLE");
    }

    #[test]
    fn invalid_cors_origin_is_skipped() {
        let _ = cors_layer(&["https://krishimitra.in".to_string(), "bad\norigin".to_string()]);
    }
}
