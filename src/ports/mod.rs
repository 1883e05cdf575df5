//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Hosted language model
//! - `FlowSchemaValidator` - Flow payload schemas
//! - `SessionValidator` - ID token validation
//! - `ProfileStore` - Farmer profile documents
//! - `SpeechRecognizer` / `SpeechSynthesizer` - Voice input and read-aloud

mod ai_provider;
mod profile_store;
mod schema_validator;
mod session_validator;
mod speech;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ImageContent,
    Message, MessageRole, RequestMetadata, TokenUsage,
};
pub use profile_store::{ProfileStore, ProfileStoreError};
pub use schema_validator::{FlowSchemaValidator, SchemaValidationError};
pub use session_validator::SessionValidator;
pub use speech::{SpeechError, SpeechRecognizer, SpeechSynthesizer};
