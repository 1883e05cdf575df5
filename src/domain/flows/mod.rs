//! Flow contracts - typed inputs, outputs, tools and fallbacks for every
//! model-backed feature of the dashboard.
//!
//! # Module Organization
//!
//! - `market` - Market price analysis and the price lookup tool
//! - `diagnosis` - Crop disease diagnosis and search-link construction
//! - `recommendation` - Crop recommendation
//! - `schemes` - Government scheme lookup
//! - `weather` - Static weather forecast tool
//! - `learning` - E-learning video search and article summaries
//! - `chat` - Chatbot intent routing and navigation suggestions
//! - `prompts` - Prompt templates and the template renderer
//! - `search_links` - `encodeURIComponent`-compatible search URLs

mod chat;
mod diagnosis;
mod learning;
mod market;
pub mod prompts;
mod recommendation;
mod schemes;
pub mod search_links;
mod weather;

pub use chat::{ChatEntities, ChatInput, ChatReply, ChatResponse, Intent, NavigationSuggestion};
pub use diagnosis::{CropDiagnosis, CropDiagnosisInput, DiagnosisDraft, PhotoDataUri};
pub use learning::{
    ArticleSummary, ArticleSummaryInput, Relevance, Video, VideoSearchInput, VideoSearchResults,
    SAMPLE_VIDEO_IDS,
};
pub use market::{
    lookup_market_price, MarketAnalysis, MarketAnalysisInput, MarketPrice, MarketQuery,
    PriceSource, PriceUnit,
};
pub use recommendation::{CropRecommendationInput, CropRecommendations, FarmType, RecommendedCrop};
pub use schemes::{SchemeDetails, SchemeQueryInput, NATIONAL_SCHEME_PORTAL};
pub use weather::{
    forecast_for_city, CurrentWeather, DailyForecast, WeatherForecast, WeatherIcon, WeatherInput,
};

use std::fmt;

/// Every JSON document shape that crosses the flow boundary.
///
/// Input schemas guard request bodies before any network call; output
/// schemas are embedded in the system prompt and checked against the
/// model's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowSchema {
    MarketAnalysisInput,
    MarketQuery,
    MarketAnalysis,
    CropDiagnosisInput,
    DiagnosisDraft,
    CropRecommendationInput,
    CropRecommendations,
    SchemeQueryInput,
    SchemeDetails,
    WeatherInput,
    VideoSearchInput,
    VideoSearchResults,
    ArticleSummaryInput,
    ArticleSummary,
    ChatInput,
    ChatReply,
    SpeechInput,
}

impl FlowSchema {
    /// Returns all schemas.
    pub fn all() -> &'static [FlowSchema] {
        &[
            FlowSchema::MarketAnalysisInput,
            FlowSchema::MarketQuery,
            FlowSchema::MarketAnalysis,
            FlowSchema::CropDiagnosisInput,
            FlowSchema::DiagnosisDraft,
            FlowSchema::CropRecommendationInput,
            FlowSchema::CropRecommendations,
            FlowSchema::SchemeQueryInput,
            FlowSchema::SchemeDetails,
            FlowSchema::WeatherInput,
            FlowSchema::VideoSearchInput,
            FlowSchema::VideoSearchResults,
            FlowSchema::ArticleSummaryInput,
            FlowSchema::ArticleSummary,
            FlowSchema::ChatInput,
            FlowSchema::ChatReply,
            FlowSchema::SpeechInput,
        ]
    }

    /// Returns the schemas that guard request bodies.
    pub fn inputs() -> impl Iterator<Item = FlowSchema> {
        Self::all().iter().copied().filter(FlowSchema::is_input)
    }

    pub fn is_input(&self) -> bool {
        matches!(
            self,
            FlowSchema::MarketAnalysisInput
                | FlowSchema::CropDiagnosisInput
                | FlowSchema::CropRecommendationInput
                | FlowSchema::SchemeQueryInput
                | FlowSchema::WeatherInput
                | FlowSchema::VideoSearchInput
                | FlowSchema::ArticleSummaryInput
                | FlowSchema::ChatInput
                | FlowSchema::SpeechInput
        )
    }

    /// Snake-case name, matching the embedded schema file.
    pub fn name(&self) -> &'static str {
        match self {
            FlowSchema::MarketAnalysisInput => "market_analysis_input",
            FlowSchema::MarketQuery => "market_query",
            FlowSchema::MarketAnalysis => "market_analysis",
            FlowSchema::CropDiagnosisInput => "crop_diagnosis_input",
            FlowSchema::DiagnosisDraft => "diagnosis_draft",
            FlowSchema::CropRecommendationInput => "crop_recommendation_input",
            FlowSchema::CropRecommendations => "crop_recommendations",
            FlowSchema::SchemeQueryInput => "scheme_query_input",
            FlowSchema::SchemeDetails => "scheme_details",
            FlowSchema::WeatherInput => "weather_input",
            FlowSchema::VideoSearchInput => "video_search_input",
            FlowSchema::VideoSearchResults => "video_search_results",
            FlowSchema::ArticleSummaryInput => "article_summary_input",
            FlowSchema::ArticleSummary => "article_summary",
            FlowSchema::ChatInput => "chat_input",
            FlowSchema::ChatReply => "chat_reply",
            FlowSchema::SpeechInput => "speech_input",
        }
    }
}

impl fmt::Display for FlowSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
