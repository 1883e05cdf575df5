//! Speech adapters.

mod mock;
mod openai;
mod unconfigured;

pub use mock::MockSpeech;
pub use openai::{OpenAISpeech, OpenAISpeechConfig};
pub use unconfigured::UnconfiguredSpeech;
