//! HTTP handlers for profile endpoints.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    GetOrCreateProfileHandler, UpdateProfileCommand, UpdateProfileHandler,
};

use super::dto::{ProfileResponse, UpdateProfileRequest};

#[derive(Clone)]
pub struct ProfileHandlers {
    get_handler: Arc<GetOrCreateProfileHandler>,
    update_handler: Arc<UpdateProfileHandler>,
}

impl ProfileHandlers {
    pub fn new(
        get_handler: Arc<GetOrCreateProfileHandler>,
        update_handler: Arc<UpdateProfileHandler>,
    ) -> Self {
        Self {
            get_handler,
            update_handler,
        }
    }
}

/// GET /api/profile - Fetch, creating with defaults on first call
pub async fn get_profile(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = handlers.get_handler.handle(&user).await?;
    Ok(Json(profile.into()))
}

/// PATCH /api/profile - Merge a partial update
pub async fn update_profile(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(req) = body?;
    let cmd = UpdateProfileCommand {
        user,
        update: req.into(),
    };

    let profile = handlers.update_handler.handle(cmd).await?;
    Ok(Json(profile.into()))
}
