//! Authentication types for the domain layer.
//!
//! An `AuthenticatedUser` is what remains of a validated ID token once the
//! identity provider has vouched for it. Any provider can populate it via
//! the `SessionValidator` port; handlers receive it explicitly through the
//! `RequireAuth` extractor.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    /// Identity subject (`sub` claim).
    pub id: UserId,

    /// Email address, when the sign-in method provides one.
    pub email: Option<String>,

    /// Display name (`name` claim).
    pub display_name: Option<String>,

    /// Avatar URL (`picture` claim).
    pub photo_url: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Returns the display name, falling back to the email, then the subject.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Authentication errors that can occur during token validation.
///
/// These describe what went wrong from the service's perspective, not the
/// identity provider's.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The identity provider (or its key set) could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
