//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Hosted language models (OpenAI-compatible, Anthropic, mock)
//! - `auth` - ID token validation (JWKS, mock)
//! - `http` - axum REST API
//! - `profile` - Profile stores (PostgreSQL, in-memory)
//! - `speech` - Transcription and speech synthesis
//! - `validation` - Flow payload schemas

pub mod ai;
pub mod auth;
pub mod http;
pub mod profile;
pub mod speech;
pub mod validation;
