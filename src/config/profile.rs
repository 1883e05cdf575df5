//! Defaults for newly created profiles

use serde::Deserialize;

use crate::domain::locale::Locale;
use crate::domain::profile::ProfileDefaults;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Wire code; unknown codes mean English
    #[serde(default)]
    pub default_language: String,
}

impl ProfileConfig {
    pub fn defaults(&self) -> ProfileDefaults {
        let location = self.default_location.trim();
        ProfileDefaults {
            location: if location.is_empty() {
                default_location()
            } else {
                location.to_string()
            },
            language: Locale::from_code(&self.default_language),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            default_language: String::new(),
        }
    }
}

fn default_location() -> String {
    ProfileDefaults::default().location
}
