//! HTTP adapters - REST API implementations.
//!
//! - `flows` - One POST endpoint per flow, enveloped responses
//! - `voice` - Transcription and voice chat
//! - `profile` - Get-or-create and merge
//! - `middleware` - Bearer token validation
//! - `error` - JSON error bodies and status mapping
//! - `router` - Wiring and cross-cutting layers

pub mod error;
pub mod flows;
pub mod middleware;
pub mod profile;
pub mod router;
pub mod voice;

pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, Ports, RouterSettings};
