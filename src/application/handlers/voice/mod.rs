//! Voice input handlers.

mod recognize;
mod transcribe;

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::ports::SpeechError;

pub use recognize::recognize_once;
pub use transcribe::{TranscribeCommand, TranscribeHandler, VoiceChatHandler, VoiceChatResult};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoiceError {
    #[error("invalid audio: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("recognition cancelled")]
    Cancelled,
}
