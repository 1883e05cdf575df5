//! Session validation port for ID token validation.
//!
//! Sign-in happens in the client against the managed identity provider;
//! the service only sees the resulting ID token. This port validates it and
//! extracts the user identity. Implementations exist for JWKS-signed tokens
//! and for tests.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected identity project
//! - **Audience (aud)**: Token must be intended for this application
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates ID tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` when signing keys cannot be fetched
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
