//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `locale` - Supported interface languages
//! - `flows` - Typed contracts, tools and fallbacks for model-backed flows
//! - `profile` - Farmer profile document and merge rules
//! - `speech` - Audio payloads for speech recognition and synthesis

pub mod flows;
pub mod foundation;
pub mod locale;
pub mod profile;
pub mod speech;
