//! Application handlers.
//!
//! - `flows` - Model-backed flows with their fallbacks
//! - `profile` - Profile get-or-create and merge
//! - `voice` - Transcription and voice chat

pub mod flows;
pub mod profile;
pub mod voice;

pub use flows::{
    ArticleSummaryHandler, ChatHandler, CropDiagnosisHandler, CropRecommendationHandler,
    FlowContext, FlowError, FlowInvoker, FlowOutcome, MarketAnalysisHandler, SchemeLookupHandler,
    TextToSpeechHandler, UpstreamError, VideoSearchHandler, WeatherForecastHandler,
};
pub use profile::{GetOrCreateProfileHandler, UpdateProfileCommand, UpdateProfileHandler};
pub use voice::{
    recognize_once, TranscribeCommand, TranscribeHandler, VoiceChatHandler, VoiceChatResult,
    VoiceError,
};
