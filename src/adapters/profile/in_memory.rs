//! In-memory ProfileStore for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::profile::{ProfileUpdate, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Profiles keyed by user id. Writes hold the map's write lock, so
/// `create_if_absent` and `merge` are atomic per process.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn create_if_absent(&self, profile: UserProfile) -> Result<UserProfile, ProfileStoreError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles
            .entry(profile.user_id.clone())
            .or_insert(profile);
        Ok(stored.clone())
    }

    async fn merge(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ProfileStoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| ProfileStoreError::NotFound(user_id.clone()))?;
        profile.apply(update);
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AuthenticatedUser;
    use crate::domain::locale::Locale;
    use crate::domain::profile::ProfileDefaults;
    use std::sync::Arc;

    fn farmer(id: &str) -> UserProfile {
        let user = AuthenticatedUser::new(UserId::new(id).unwrap()).with_display_name("Ramesh");
        UserProfile::from_identity(&user, &ProfileDefaults::default())
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_user() {
        let store = InMemoryProfileStore::new();
        let found = store.get(&UserId::new("nobody").unwrap()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn create_if_absent_never_overwrites() {
        let store = InMemoryProfileStore::new();
        let first = farmer("u1");
        store.create_if_absent(first.clone()).await.unwrap();

        let mut second = farmer("u1");
        second.location = "Nagpur, Maharashtra".to_string();
        let stored = store.create_if_absent(second).await.unwrap();

        assert_eq!(stored, first);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_leave_one_document() {
        let store = Arc::new(InMemoryProfileStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create_if_absent(farmer("u1")).await.unwrap() })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(store.len().await, 1);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn merge_requires_existing_profile() {
        let store = InMemoryProfileStore::new();
        let err = store
            .merge(&UserId::new("u1").unwrap(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn repeated_merge_is_idempotent() {
        let store = InMemoryProfileStore::new();
        store.create_if_absent(farmer("u1")).await.unwrap();
        let update = ProfileUpdate {
            language: Some(Locale::Kn),
            crops: Some(vec!["Ragi".to_string(), " ragi ".to_string(), "Maize".to_string()]),
            ..Default::default()
        };
        let id = UserId::new("u1").unwrap();

        let once = store.merge(&id, &update).await.unwrap();
        let twice = store.merge(&id, &update).await.unwrap();
        let thrice = store.merge(&id, &update).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice, thrice);
        assert_eq!(once.crops, vec!["Ragi", "Maize"]);
        assert_eq!(once.display_name.as_deref(), Some("Ramesh"));
    }
}
