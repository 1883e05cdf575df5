//! Mock session validator for tests and local development.
//!
//! Maps fixed bearer tokens to users, so the HTTP surface can be exercised
//! without the managed identity provider.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("dev-token", "farmer-1");
//! let user = validator.validate("dev-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Error returned for every validation, when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token with a simple test user.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let id = match UserId::new(&user_id) {
            Ok(id) => id,
            Err(e) => panic!("invalid test user id {:?}: {}", user_id, e),
        };
        let user = AuthenticatedUser::new(id)
            .with_email(format!("{}@test.krishimitra.in", user_id))
            .with_display_name(format!("Test Farmer {}", user_id));
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-123").unwrap()).with_email("test@example.com")
    }

    #[tokio::test]
    async fn returns_user_for_registered_token() {
        let validator = MockSessionValidator::new().with_user("valid-token", test_user());

        let user = validator.validate("valid-token").await.unwrap();

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email.as_deref(), Some("test@example.com"));
    }

    #[tokio::test]
    async fn returns_invalid_token_for_unknown() {
        let validator = MockSessionValidator::new();
        let result = validator.validate("unknown-token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn with_test_user_creates_user() {
        let validator = MockSessionValidator::new().with_test_user("my-token", "user-456");

        let user = validator.validate("my-token").await.unwrap();

        assert_eq!(user.id.as_str(), "user-456");
        assert!(user.email.unwrap().contains("user-456"));
        assert_eq!(user.display_name.as_deref(), Some("Test Farmer user-456"));
    }

    #[tokio::test]
    async fn forced_error_wins_until_cleared() {
        let validator = MockSessionValidator::new()
            .with_user("valid-token", test_user())
            .with_error(AuthError::service_unavailable("Test"));

        assert!(matches!(
            validator.validate("valid-token").await,
            Err(AuthError::ServiceUnavailable(_))
        ));

        validator.clear_error();
        assert!(validator.validate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn add_token_works_at_runtime() {
        let validator = MockSessionValidator::new();
        assert!(validator.validate("new-token").await.is_err());

        validator.add_token("new-token", test_user());

        assert!(validator.validate("new-token").await.is_ok());
        assert_eq!(validator.token_count(), 1);
    }
}
