//! GetOrCreateProfile - Query handler returning the caller's profile,
//! creating it with defaults on first fetch.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::domain::profile::{ProfileDefaults, UserProfile};
use crate::ports::ProfileStore;

/// Handler for fetching the caller's profile.
pub struct GetOrCreateProfileHandler {
    store: Arc<dyn ProfileStore>,
    defaults: ProfileDefaults,
}

impl GetOrCreateProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>, defaults: ProfileDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(&self, user: &AuthenticatedUser) -> Result<UserProfile, DomainError> {
        // 1. Existing document wins
        if let Some(profile) = self.store.get(&user.id).await? {
            return Ok(profile);
        }

        // 2. First fetch: build from identity claims and insert unless a
        //    concurrent request got there first
        let created = self
            .store
            .create_if_absent(UserProfile::from_identity(user, &self.defaults))
            .await?;

        tracing::info!(user_id = %user.id, "Profile created on first fetch");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::profile::InMemoryProfileStore;
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::locale::Locale;
    use crate::domain::profile::ProfileUpdate;
    use crate::ports::ProfileStoreError;
    use async_trait::async_trait;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("farmer-1").unwrap())
            .with_email("asha@example.com")
            .with_display_name("Asha")
    }

    #[tokio::test]
    async fn first_fetch_creates_default_document() {
        let store = Arc::new(InMemoryProfileStore::new());
        let handler = GetOrCreateProfileHandler::new(store.clone(), ProfileDefaults::default());

        let profile = handler.handle(&user()).await.unwrap();

        assert_eq!(profile.display_name.as_deref(), Some("Asha"));
        assert_eq!(profile.location, ProfileDefaults::default().location);
        assert_eq!(profile.language, Locale::En);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn existing_document_is_not_overwritten() {
        let store = Arc::new(InMemoryProfileStore::new());
        let handler = GetOrCreateProfileHandler::new(store.clone(), ProfileDefaults::default());
        handler.handle(&user()).await.unwrap();
        store
            .merge(
                &user().id,
                &ProfileUpdate {
                    location: Some("Nashik, Maharashtra".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let profile = handler.handle(&user()).await.unwrap();

        assert_eq!(profile.location, "Nashik, Maharashtra");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_first_fetches_create_one_document() {
        let store = Arc::new(InMemoryProfileStore::new());
        let handler = Arc::new(GetOrCreateProfileHandler::new(
            store.clone(),
            ProfileDefaults::default(),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(&user()).await.unwrap() })
            })
            .collect();
        let mut created = Vec::new();
        for task in tasks {
            created.push(task.await.unwrap().created_at);
        }

        assert_eq!(store.len().await, 1);
        assert!(created.windows(2).all(|w| w[0] == w[1]));
    }

    struct FailingStore;

    #[async_trait]
    impl ProfileStore for FailingStore {
        async fn get(&self, _: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
            Err(ProfileStoreError::storage("connection refused"))
        }

        async fn create_if_absent(&self, _: UserProfile) -> Result<UserProfile, ProfileStoreError> {
            unimplemented!()
        }

        async fn merge(&self, _: &UserId, _: &ProfileUpdate) -> Result<UserProfile, ProfileStoreError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn storage_failure_maps_to_database_error() {
        let handler = GetOrCreateProfileHandler::new(Arc::new(FailingStore), ProfileDefaults::default());

        let err = handler.handle(&user()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
