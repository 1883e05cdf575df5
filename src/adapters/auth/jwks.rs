//! JWKS-backed ID token validation.
//!
//! Implements the `SessionValidator` port for tokens minted by the managed
//! identity provider (Firebase-style secure tokens). A token is accepted when:
//!
//! 1. Its `kid` names a key in the provider's published JWKS
//! 2. The signature verifies against that key
//! 3. Issuer, audience, and expiry claims match
//!
//! Claims `sub`, `email`, `name`, and `picture` map onto `AuthenticatedUser`.
//!
//! # Example
//!
//! ```ignore
//! let config = JwksConfig::for_project("krishimitra-prod");
//! let validator = JwksSessionValidator::new(config);
//! let user = validator.validate("eyJ...").await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    errors::ErrorKind,
    jwk::{JwkSet, KeyAlgorithm},
    Algorithm, DecodingKey, Header, TokenData, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Public signing keys for secure tokens.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Configuration for the JWKS validator.
#[derive(Debug, Clone)]
pub struct JwksConfig {
    /// Expected `iss` claim.
    pub issuer: String,

    /// Expected `aud` claim (the identity project id).
    pub audience: String,

    pub jwks_url: String,

    /// How long to cache JWKS before refetching.
    pub cache_duration: Duration,
}

impl JwksConfig {
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_url: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            jwks_url: jwks_url.into(),
            cache_duration: Duration::from_secs(3600),
        }
    }

    /// Issuer and audience derived from the identity project id.
    pub fn for_project(project_id: &str) -> Self {
        Self::new(
            format!("https://securetoken.google.com/{}", project_id),
            project_id,
            DEFAULT_JWKS_URL,
        )
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }
}

/// ID token claims we read.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// Production implementation of `SessionValidator`.
pub struct JwksSessionValidator {
    config: JwksConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl JwksSessionValidator {
    /// Keys are fetched lazily on first validation.
    pub fn new(config: JwksConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = &self.config.jwks_url;
        tracing::debug!("Fetching JWKS from {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("Fetched {} keys from JWKS", jwks.keys.len());
        Ok(jwks)
    }

    /// Get JWKS, using cache if available and not expired.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        let mut cache = self.jwks_cache.write().await;
        *cache = Some(JwksCache::new(jwks.clone(), self.config.cache_duration));

        Ok(jwks)
    }

    fn find_decoding_key(header: &Header, jwks: &JwkSet) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_ref().ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!("No matching key found for kid: {}", kid);
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(other) => {
                tracing::warn!("Unsupported algorithm: {:?}", other);
                return Err(AuthError::InvalidToken);
            }
        };

        if header.alg != algorithm {
            tracing::warn!("Token alg {:?} does not match key alg {:?}", header.alg, algorithm);
            return Err(AuthError::InvalidToken);
        }

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("Failed to create decoding key: {}", e);
            AuthError::InvalidToken
        })?;

        Ok((decoding_key, algorithm))
    }

    fn decode_claims(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenData<IdTokenClaims>, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<IdTokenClaims>(token, decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                tracing::debug!("Token expired");
                AuthError::TokenExpired
            }
            ErrorKind::InvalidIssuer => {
                tracing::warn!("Invalid issuer in token");
                AuthError::InvalidToken
            }
            ErrorKind::InvalidAudience => {
                tracing::warn!("Invalid audience in token");
                AuthError::InvalidToken
            }
            _ => {
                tracing::warn!("Token validation failed: {}", e);
                AuthError::InvalidToken
            }
        })
    }
}

#[async_trait]
impl SessionValidator for JwksSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Failed to decode JWT header: {}", e);
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let (decoding_key, algorithm) = Self::find_decoding_key(&header, &jwks)?;
        let claims = self.decode_claims(token, &decoding_key, algorithm)?.claims;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Token carries a blank subject");
            AuthError::InvalidToken
        })?;

        let mut user = AuthenticatedUser::new(user_id);
        user.email = claims.email;
        user.display_name = claims.name;
        user.photo_url = claims.picture;
        Ok(user)
    }
}

impl std::fmt::Debug for JwksSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksSessionValidator")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use jsonwebtoken::{encode, EncodingKey};
    use serde_json::json;

    /// Key lookup happens before signature checks, so an HMAC token is
    /// enough to drive the paths below.
    fn token_with_kid(kid: &str) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(kid.to_string());
        encode(
            &header,
            &json!({ "sub": "farmer-1", "exp": 4_000_000_000u64 }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    #[test]
    fn config_for_project_derives_issuer_and_audience() {
        let config = JwksConfig::for_project("krishimitra-dev");
        assert_eq!(config.issuer, "https://securetoken.google.com/krishimitra-dev");
        assert_eq!(config.audience, "krishimitra-dev");
        assert_eq!(config.jwks_url, DEFAULT_JWKS_URL);
        assert_eq!(config.cache_duration, Duration::from_secs(3600));
    }

    #[test]
    fn config_with_custom_cache_duration() {
        let config = JwksConfig::for_project("p").with_cache_duration(Duration::from_secs(300));
        assert_eq!(config.cache_duration, Duration::from_secs(300));
    }

    #[test]
    fn jwks_cache_not_expired_initially() {
        let cache = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        assert!(!cache.is_expired());
    }

    #[test]
    fn jwks_cache_expires_after_duration() {
        let cache = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.is_expired());
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwksSessionValidator>();
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_without_fetching_keys() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/jwks");
                then.status(200).json_body(json!({ "keys": [] }));
            })
            .await;

        let validator = JwksSessionValidator::new(JwksConfig::new(
            "https://securetoken.google.com/p",
            "p",
            server.url("/jwks"),
        ));

        let result = validator.validate("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn unreachable_key_set_is_service_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jwks");
                then.status(500);
            })
            .await;

        let validator = JwksSessionValidator::new(JwksConfig::new(
            "https://securetoken.google.com/p",
            "p",
            server.url("/jwks"),
        ));

        let result = validator.validate(&token_with_kid("key-1")).await;
        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected_and_keys_are_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/jwks");
                then.status(200).json_body(json!({ "keys": [] }));
            })
            .await;

        let validator = JwksSessionValidator::new(JwksConfig::new(
            "https://securetoken.google.com/p",
            "p",
            server.url("/jwks"),
        ));

        for _ in 0..2 {
            let result = validator.validate(&token_with_kid("rotated-away")).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
        assert_eq!(mock.hits_async().await, 1);
    }
}
