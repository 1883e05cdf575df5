//! HTTP DTOs for profile endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::locale::Locale;
use crate::domain::profile::{deserialize_clearable, ProfileUpdate, UserProfile};

/// Partial profile update; absent fields are left untouched and `null`
/// clears `display_name` or `photo_url`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub photo_url: Option<Option<String>>,
    pub location: Option<String>,
    pub language: Option<Locale>,
    pub crops: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            photo_url: req.photo_url,
            location: req.location,
            language: req.language,
            crops: req.crops,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub location: String,
    pub language: Locale,
    pub crops: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            display_name: profile.display_name,
            email: profile.email,
            photo_url: profile.photo_url,
            location: profile.location,
            language: profile.language,
            crops: profile.crops,
            created_at: profile.created_at.as_datetime().to_rfc3339(),
            updated_at: profile.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_request_accepts_partial_body() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "language": "bn", "crops": ["Jute"] })).unwrap();
        let update = ProfileUpdate::from(req);

        assert_eq!(update.language, Some(Locale::Bn));
        assert_eq!(update.crops, Some(vec!["Jute".to_string()]));
        assert!(update.location.is_none());
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let result: Result<UpdateProfileRequest, _> =
            serde_json::from_value(json!({ "email": "x@example.com" }));
        assert!(result.is_err());
    }
}
