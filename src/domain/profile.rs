//! Farmer profile document.
//!
//! One document per authenticated user. The first fetch creates it from the
//! identity claims plus [`ProfileDefaults`]; every later write is a merge
//! that only touches the fields it names.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{AuthenticatedUser, Timestamp, UserId, ValidationError};
use crate::domain::locale::Locale;

/// Values a new profile starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDefaults {
    pub location: String,
    pub language: Locale,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            location: "Pune, Maharashtra".to_string(),
            language: Locale::En,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub location: String,
    pub language: Locale,
    pub crops: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// Builds the document created on first fetch.
    pub fn from_identity(user: &AuthenticatedUser, defaults: &ProfileDefaults) -> Self {
        let now = Timestamp::now();
        Self {
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            photo_url: user.photo_url.clone(),
            location: defaults.location.clone(),
            language: defaults.language,
            crops: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges `update` into the document.
    ///
    /// Returns true if any field changed. `updated_at` moves only in that
    /// case, so re-applying the same update leaves the document identical.
    pub fn apply(&mut self, update: &ProfileUpdate) -> bool {
        let mut changed = false;

        if let Some(name) = &update.display_name {
            changed |= replace(&mut self.display_name, trimmed(name));
        }
        if let Some(url) = &update.photo_url {
            changed |= replace(&mut self.photo_url, trimmed(url));
        }
        if let Some(location) = &update.location {
            changed |= replace(&mut self.location, location.trim().to_string());
        }
        if let Some(language) = update.language {
            changed |= replace(&mut self.language, language);
        }
        if let Some(crops) = &update.crops {
            changed |= replace(&mut self.crops, normalize_crops(crops));
        }

        if changed {
            self.updated_at = Timestamp::now();
        }
        changed
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Trims entries, drops blanks and removes case-insensitive duplicates.
fn normalize_crops(crops: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(crops.len());
    for crop in crops.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(crop)) {
            out.push(crop.to_string());
        }
    }
    out
}

/// Reads a present field as `Some(value)`, so an explicit `null` becomes
/// `Some(None)` while an absent field stays `None` via `#[serde(default)]`.
pub fn deserialize_clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Partial profile update. Absent fields are left untouched; `display_name`
/// and `photo_url` are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    pub photo_url: Option<Option<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub language: Option<Locale>,
    #[serde(default)]
    pub crops: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(Some(name)) = &self.display_name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("display_name"));
            }
        }
        if let Some(location) = &self.location {
            if location.trim().is_empty() {
                return Err(ValidationError::empty_field("location"));
            }
        }
        if let Some(Some(url)) = &self.photo_url {
            let url = url.trim();
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ValidationError::invalid_format("photo_url", "expected an http(s) URL"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("farmer-1").unwrap())
            .with_email("asha@example.com")
            .with_display_name("Asha")
    }

    fn profile() -> UserProfile {
        UserProfile::from_identity(&user(), &ProfileDefaults::default())
    }

    #[test]
    fn new_profile_uses_identity_and_defaults() {
        let p = profile();
        assert_eq!(p.user_id.as_str(), "farmer-1");
        assert_eq!(p.display_name.as_deref(), Some("Asha"));
        assert_eq!(p.email.as_deref(), Some("asha@example.com"));
        assert_eq!(p.location, "Pune, Maharashtra");
        assert_eq!(p.language, Locale::En);
        assert!(p.crops.is_empty());
        assert_eq!(p.created_at, p.updated_at);
    }

    #[test]
    fn apply_merges_only_named_fields() {
        let mut p = profile();
        let update = ProfileUpdate {
            location: Some("Hubli, Karnataka".to_string()),
            ..Default::default()
        };
        assert!(p.apply(&update));
        assert_eq!(p.location, "Hubli, Karnataka");
        assert_eq!(p.display_name.as_deref(), Some("Asha"));
        assert_eq!(p.language, Locale::En);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut p = profile();
        let update = ProfileUpdate {
            language: Some(Locale::Kn),
            crops: Some(vec!["Ragi".to_string(), " ragi ".to_string(), "Jowar".to_string()]),
            ..Default::default()
        };
        assert!(p.apply(&update));
        let once = p.clone();

        for _ in 0..5 {
            assert!(!p.apply(&update));
        }
        assert_eq!(p, once);
        assert_eq!(p.crops, vec!["Ragi".to_string(), "Jowar".to_string()]);
    }

    #[test]
    fn unchanged_value_does_not_bump_updated_at() {
        let mut p = profile();
        let before = p.updated_at;
        let update = ProfileUpdate {
            location: Some("Pune, Maharashtra".to_string()),
            ..Default::default()
        };
        assert!(!p.apply(&update));
        assert_eq!(p.updated_at, before);
    }

    #[test]
    fn explicit_null_clears_display_name_and_photo() {
        let mut p = profile();
        p.photo_url = Some("https://example.com/asha.jpg".to_string());

        let update: ProfileUpdate =
            serde_json::from_str(r#"{ "display_name": null, "photo_url": null }"#).unwrap();
        assert_eq!(update.display_name, Some(None));
        assert!(update.validate().is_ok());

        assert!(p.apply(&update));
        assert!(p.display_name.is_none());
        assert!(p.photo_url.is_none());
        assert!(!p.apply(&update));
    }

    #[test]
    fn absent_display_name_is_not_a_clear() {
        let update: ProfileUpdate = serde_json::from_str(r#"{ "location": "Nashik" }"#).unwrap();
        assert_eq!(update.display_name, None);
        assert_eq!(update.photo_url, None);
    }

    #[test]
    fn validate_rejects_blank_location() {
        let update = ProfileUpdate {
            location: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_photo_url() {
        let update = ProfileUpdate {
            photo_url: Some(Some("ftp://example.com/a.png".to_string())),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(ProfileUpdate::default().is_empty());
        let json: ProfileUpdate = serde_json::from_str("{}").unwrap();
        assert!(json.is_empty());
    }
}
