//! HTTP adapter for voice endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{TranscriptResponse, VoiceChatResponse, VoiceRequest};
pub use handlers::VoiceHandlers;
pub use routes::voice_routes;
