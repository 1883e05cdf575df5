//! HTTP routes for flow endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    article_summary, chat, crop_diagnosis, crop_recommendation, market_analysis, schemes, speech,
    videos, weather, FlowHandlers,
};

/// Creates the flow router, mounted under `/api/flows`.
pub fn flow_routes(handlers: FlowHandlers) -> Router {
    Router::new()
        .route("/market-analysis", post(market_analysis))
        .route("/crop-diagnosis", post(crop_diagnosis))
        .route("/crop-recommendation", post(crop_recommendation))
        .route("/schemes", post(schemes))
        .route("/weather", post(weather))
        .route("/videos", post(videos))
        .route("/article-summary", post(article_summary))
        .route("/chat", post(chat))
        .route("/speech", post(speech))
        .with_state(handlers)
}
