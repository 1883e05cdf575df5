//! UpdateProfile - Command handler merging a partial update into the
//! caller's profile.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::domain::profile::{ProfileDefaults, ProfileUpdate, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Command to merge fields into a profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user: AuthenticatedUser,
    pub update: ProfileUpdate,
}

/// Handler for profile updates.
pub struct UpdateProfileHandler {
    store: Arc<dyn ProfileStore>,
    defaults: ProfileDefaults,
}

impl UpdateProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>, defaults: ProfileDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<UserProfile, DomainError> {
        // 1. Validate before touching storage
        cmd.update.validate()?;

        // 2. A PATCH may arrive before the first GET
        if self.store.get(&cmd.user.id).await?.is_none() {
            self.store
                .create_if_absent(UserProfile::from_identity(&cmd.user, &self.defaults))
                .await?;
        }

        if cmd.update.is_empty() {
            return self.current(&cmd.user).await;
        }

        // 3. Merge and return the stored document
        let profile = self.store.merge(&cmd.user.id, &cmd.update).await?;
        tracing::info!(user_id = %cmd.user.id, "Profile updated");
        Ok(profile)
    }

    async fn current(&self, user: &AuthenticatedUser) -> Result<UserProfile, DomainError> {
        match self.store.get(&user.id).await? {
            Some(profile) => Ok(profile),
            None => Err(ProfileStoreError::NotFound(user.id.clone()).into()),
        }
    }
}
