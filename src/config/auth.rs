//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (managed identity provider ID tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Identity project id; implies issuer and audience when those are unset
    pub project_id: Option<String>,

    /// Expected `iss` claim
    pub issuer: Option<String>,

    /// Expected `aud` claim
    pub audience: Option<String>,

    /// JWKS endpoint; the identity provider's public key set when unset
    pub jwks_url: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,

    /// Static `token=user_id` pairs (comma-separated) accepted instead of
    /// real ID tokens. Development only.
    pub dev_tokens: Option<String>,
}

impl AuthConfig {
    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    pub fn resolved_issuer(&self) -> Option<String> {
        non_empty(&self.issuer).map(str::to_string).or_else(|| {
            non_empty(&self.project_id).map(|id| format!("https://securetoken.google.com/{}", id))
        })
    }

    pub fn resolved_audience(&self) -> Option<String> {
        non_empty(&self.audience)
            .or_else(|| non_empty(&self.project_id))
            .map(str::to_string)
    }

    pub fn uses_dev_tokens(&self) -> bool {
        non_empty(&self.dev_tokens).is_some()
    }

    /// Parses `dev_tokens` into `(token, user_id)` pairs.
    pub fn dev_token_pairs(&self) -> Result<Vec<(String, String)>, ValidationError> {
        let Some(raw) = non_empty(&self.dev_tokens) else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                    Ok((token.trim().to_string(), user.trim().to_string()))
                }
                _ => Err(ValidationError::InvalidDevToken(entry.to_string())),
            })
            .collect()
    }

    /// Validate authentication configuration
    ///
    /// Development tokens replace JWKS validation entirely and are refused
    /// in production.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.uses_dev_tokens() {
            if *environment == Environment::Production {
                return Err(ValidationError::DevTokensInProduction);
            }
            self.dev_token_pairs()?;
            return Ok(());
        }

        if self.resolved_issuer().is_none() {
            return Err(ValidationError::MissingRequired("AUTH__PROJECT_ID or AUTH__ISSUER"));
        }
        if self.resolved_audience().is_none() {
            return Err(ValidationError::MissingRequired("AUTH__PROJECT_ID or AUTH__AUDIENCE"));
        }
        if *environment == Environment::Production {
            if let Some(url) = non_empty(&self.jwks_url) {
                if !url.starts_with("https://") {
                    return Err(ValidationError::JwksUrlMustBeHttps);
                }
            }
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            issuer: None,
            audience: None,
            jwks_url: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
            dev_tokens: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
