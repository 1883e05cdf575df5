//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Flow handlers own fallback substitution; profile handlers own the
//! get-or-create and merge rules; voice handlers own cancellation.

pub mod handlers;

pub use handlers::{
    // Flow handlers
    ArticleSummaryHandler, ChatHandler, CropDiagnosisHandler, CropRecommendationHandler,
    FlowContext, FlowError, FlowInvoker, FlowOutcome, MarketAnalysisHandler, SchemeLookupHandler,
    TextToSpeechHandler, UpstreamError, VideoSearchHandler, WeatherForecastHandler,
    // Profile handlers
    GetOrCreateProfileHandler, UpdateProfileCommand, UpdateProfileHandler,
    // Voice handlers
    TranscribeCommand, TranscribeHandler, VoiceChatHandler, VoiceChatResult, VoiceError,
};
