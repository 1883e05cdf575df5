//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider serves every flow
    #[serde(default)]
    pub provider: AiProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Model override for OpenAI-compatible endpoints
    pub openai_model: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints
    pub openai_base_url: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Model override for Anthropic
    pub anthropic_model: Option<String>,

    pub anthropic_base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
    /// Scripted provider with an empty queue; every flow serves its fallback.
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        match self.provider {
            AiProvider::OpenAI if !self.has_openai() => {
                Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
            }
            AiProvider::Mock if *environment == Environment::Production => {
                Err(ValidationError::MockProviderInProduction)
            }
            _ => Ok(()),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            openai_model: None,
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: None,
            anthropic_base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::OpenAI);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_primary_provider_requires_key() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let config = AiConfig {
            openai_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.has_openai());
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_mock_provider_only_outside_production() {
        let config = AiConfig {
            provider: AiProvider::Mock,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::MockProviderInProduction)
        );
    }

    #[test]
    fn test_valid_openai_config() {
        let config = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }
}
