//! ProfileStore port for farmer profile persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::profile::{ProfileUpdate, UserProfile};

/// Document store holding one profile per user.
///
/// # Contract
///
/// - `create_if_absent` never overwrites an existing document; it returns
///   whichever document is stored once it completes.
/// - `merge` applies the update atomically with respect to other writes for
///   the same user and bumps `updated_at` only when a field changes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// Insert `profile` unless a document already exists for its user.
    async fn create_if_absent(&self, profile: UserProfile) -> Result<UserProfile, ProfileStoreError>;

    /// Merge `update` into the stored document and return the result.
    async fn merge(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ProfileStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum ProfileStoreError {
    #[error("Profile not found for user {0}")]
    NotFound(UserId),

    #[error("Profile storage failed: {0}")]
    Storage(String),
}

impl ProfileStoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<ProfileStoreError> for DomainError {
    fn from(err: ProfileStoreError) -> Self {
        match &err {
            ProfileStoreError::NotFound(user_id) => {
                DomainError::new(ErrorCode::ProfileNotFound, err.to_string())
                    .with_detail("user_id", user_id.to_string())
            }
            ProfileStoreError::Storage(_) => DomainError::new(ErrorCode::DatabaseError, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_profile_not_found() {
        let err: DomainError = ProfileStoreError::NotFound(UserId::new("u1").unwrap()).into();
        assert_eq!(err.code, ErrorCode::ProfileNotFound);
        assert_eq!(err.details.get("user_id"), Some(&"u1".to_string()));
    }

    #[test]
    fn storage_maps_to_database_error() {
        let err: DomainError = ProfileStoreError::storage("connection reset").into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
