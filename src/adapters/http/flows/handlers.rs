//! HTTP handlers for flow endpoints.
//!
//! Bodies are taken as raw JSON so schema validation, not serde, decides
//! what a bad request looks like. Successful responses use the envelope
//! `{ "data": ..., "fallback": bool }`.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    ArticleSummaryHandler, ChatHandler, CropDiagnosisHandler, CropRecommendationHandler,
    FlowContext, FlowOutcome, MarketAnalysisHandler, SchemeLookupHandler, TextToSpeechHandler,
    VideoSearchHandler, WeatherForecastHandler,
};
use crate::domain::flows::{
    ArticleSummary, ChatResponse, CropDiagnosis, CropRecommendations, MarketAnalysis,
    SchemeDetails, VideoSearchResults, WeatherForecast,
};
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::speech::SpeechAudio;

type Body = Result<Json<Value>, JsonRejection>;
type Envelope<T> = Result<Json<FlowOutcome<T>>, ApiError>;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct FlowHandlers {
    pub market_analysis: Arc<MarketAnalysisHandler>,
    pub crop_diagnosis: Arc<CropDiagnosisHandler>,
    pub crop_recommendation: Arc<CropRecommendationHandler>,
    pub schemes: Arc<SchemeLookupHandler>,
    pub weather: Arc<WeatherForecastHandler>,
    pub videos: Arc<VideoSearchHandler>,
    pub article_summary: Arc<ArticleSummaryHandler>,
    pub chat: Arc<ChatHandler>,
    pub speech: Arc<TextToSpeechHandler>,
}

fn context(user: &AuthenticatedUser) -> FlowContext {
    FlowContext::new(user.id.clone())
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/flows/market-analysis
pub async fn market_analysis(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<MarketAnalysis> {
    let Json(payload) = body?;
    let outcome = handlers
        .market_analysis
        .handle(&payload, &context(&user))
        .await?;
    Ok(Json(outcome))
}

/// POST /api/flows/crop-diagnosis
pub async fn crop_diagnosis(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<CropDiagnosis> {
    let Json(payload) = body?;
    let outcome = handlers
        .crop_diagnosis
        .handle(&payload, &context(&user))
        .await?;
    Ok(Json(outcome))
}

/// POST /api/flows/crop-recommendation
pub async fn crop_recommendation(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<CropRecommendations> {
    let Json(payload) = body?;
    let outcome = handlers
        .crop_recommendation
        .handle(&payload, &context(&user))
        .await?;
    Ok(Json(outcome))
}

/// POST /api/flows/schemes
pub async fn schemes(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<SchemeDetails> {
    let Json(payload) = body?;
    let outcome = handlers.schemes.handle(&payload, &context(&user)).await?;
    Ok(Json(outcome))
}

/// POST /api/flows/weather
pub async fn weather(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<WeatherForecast> {
    let Json(payload) = body?;
    Ok(Json(handlers.weather.handle(&payload, &context(&user))?))
}

/// POST /api/flows/videos
pub async fn videos(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<VideoSearchResults> {
    let Json(payload) = body?;
    let outcome = handlers.videos.handle(&payload, &context(&user)).await?;
    Ok(Json(outcome))
}

/// POST /api/flows/article-summary
pub async fn article_summary(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<ArticleSummary> {
    let Json(payload) = body?;
    let outcome = handlers
        .article_summary
        .handle(&payload, &context(&user))
        .await?;
    Ok(Json(outcome))
}

/// POST /api/flows/chat
pub async fn chat(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Envelope<ChatResponse> {
    let Json(payload) = body?;
    let outcome = handlers.chat.handle(&payload, &context(&user)).await?;
    Ok(Json(outcome))
}

/// POST /api/flows/speech - `{text}` → `{media}`
pub async fn speech(
    State(handlers): State<FlowHandlers>,
    RequireAuth(user): RequireAuth,
    body: Body,
) -> Result<Json<SpeechAudio>, ApiError> {
    let Json(payload) = body?;
    let audio = handlers.speech.handle(&payload, &context(&user)).await?;
    Ok(Json(audio))
}
