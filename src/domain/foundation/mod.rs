//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types and error types
//! used across the KrishiMitra domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
