//! Flow handlers.
//!
//! One handler per model-backed feature. Each takes the raw request body,
//! validates it, and returns either the generated payload or the flow's
//! static fallback wrapped in a [`FlowOutcome`].

mod chat;
mod crop_diagnosis;
mod crop_recommendation;
mod invoker;
mod learning;
mod market_analysis;
mod scheme_lookup;
mod text_to_speech;
mod weather_forecast;

pub use chat::ChatHandler;
pub use crop_diagnosis::CropDiagnosisHandler;
pub use crop_recommendation::CropRecommendationHandler;
pub use invoker::{
    extract_json_object, FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep,
    UpstreamError,
};
pub use learning::{ArticleSummaryHandler, VideoSearchHandler};
pub use market_analysis::MarketAnalysisHandler;
pub use scheme_lookup::SchemeLookupHandler;
pub use text_to_speech::TextToSpeechHandler;
pub use weather_forecast::WeatherForecastHandler;
