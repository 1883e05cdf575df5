//! PostgreSQL implementation of ProfileStore.
//!
//! One row per user in `user_profiles`. Merges read the row with
//! `SELECT ... FOR UPDATE` inside a transaction so concurrent updates for
//! the same user serialize.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::locale::Locale;
use crate::domain::profile::{ProfileUpdate, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, display_name, email, photo_url, location, language, crops,
           created_at, updated_at
    FROM user_profiles
"#;

#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_for_update(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, ProfileStoreError> {
        let row = sqlx::query(&format!("{} WHERE user_id = $1 FOR UPDATE", SELECT_COLUMNS))
            .bind(user_id.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| storage_error("lock profile", e))?;

        row.as_ref().map(row_to_profile).transpose()
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        let row = sqlx::query(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("fetch profile", e))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn create_if_absent(&self, profile: UserProfile) -> Result<UserProfile, ProfileStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                user_id, display_name, email, photo_url, location, language, crops,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(&profile.photo_url)
        .bind(&profile.location)
        .bind(profile.language.code())
        .bind(&profile.crops)
        .bind(profile.created_at.as_datetime())
        .bind(profile.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("insert profile", e))?;

        let stored = Self::fetch_for_update(&mut tx, &profile.user_id)
            .await?
            .ok_or_else(|| ProfileStoreError::NotFound(profile.user_id.clone()))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit transaction", e))?;

        Ok(stored)
    }

    async fn merge(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ProfileStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let mut profile = Self::fetch_for_update(&mut tx, user_id)
            .await?
            .ok_or_else(|| ProfileStoreError::NotFound(user_id.clone()))?;

        if profile.apply(update) {
            let row = sqlx::query(
                r#"
                UPDATE user_profiles SET
                    display_name = $2,
                    photo_url = $3,
                    location = $4,
                    language = $5,
                    crops = $6,
                    updated_at = $7
                WHERE user_id = $1
                RETURNING user_id, display_name, email, photo_url, location, language,
                          crops, created_at, updated_at
                "#,
            )
            .bind(user_id.as_str())
            .bind(&profile.display_name)
            .bind(&profile.photo_url)
            .bind(&profile.location)
            .bind(profile.language.code())
            .bind(&profile.crops)
            .bind(profile.updated_at.as_datetime())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| storage_error("update profile", e))?;
            // Read back so the caller sees the column precision actually stored
            profile = row_to_profile(&row)?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("commit transaction", e))?;

        Ok(profile)
    }
}

fn storage_error(action: &str, e: sqlx::Error) -> ProfileStoreError {
    tracing::error!(error = %e, "Failed to {}", action);
    ProfileStoreError::storage(format!("Failed to {}: {}", action, e))
}

fn row_to_profile(row: &PgRow) -> Result<UserProfile, ProfileStoreError> {
    let user_id: String = row.get("user_id");
    let language: String = row.get("language");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(UserProfile {
        user_id: UserId::new(user_id)
            .map_err(|e| ProfileStoreError::storage(format!("Invalid user ID: {}", e)))?,
        display_name: row.get("display_name"),
        email: row.get("email"),
        photo_url: row.get("photo_url"),
        location: row.get("location"),
        language: Locale::from_code(&language),
        crops: row.get("crops"),
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
