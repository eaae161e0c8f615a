//! JWT token verification (and issuing, for HS256 deployments).
//!
//! Tokens are issued by an external identity service. Two deployment shapes
//! are supported: a shared HS256 secret, or an RS256 public key handed over
//! as base64-encoded PEM.

use base64ct::{Base64, Encoding};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use thiserror::Error;

use crate::auth::Claims;

/// Supported signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum JwtAlgorithm {
    /// HMAC-SHA256 with a shared secret.
    #[default]
    #[serde(rename = "HS256", alias = "hs256")]
    Hs256,
    /// RSA-SHA256; only the public key is known to this service.
    #[serde(rename = "RS256", alias = "rs256")]
    Rs256,
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(value: JwtAlgorithm) -> Self {
        match value {
            JwtAlgorithm::Hs256 => Self::HS256,
            JwtAlgorithm::Rs256 => Self::RS256,
        }
    }
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing algorithm.
    pub algorithm: JwtAlgorithm,
    /// Shared secret (HS256) or base64-encoded PEM public key (RS256).
    pub secret: String,
    /// Access token expiration in minutes.
    pub access_token_expires_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: JwtAlgorithm::Hs256,
            secret: "change-me-in-production".to_string(),
            access_token_expires_minutes: 15,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The configured key material could not be used.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// This service cannot issue tokens for the configured algorithm.
    #[error("token issuing is not available for {0:?}")]
    IssuingUnavailable(JwtAlgorithm),
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &self.config.algorithm)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidKey` if an RS256 public key cannot be parsed.
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        let (encoding_key, decoding_key) = match config.algorithm {
            JwtAlgorithm::Hs256 => (
                Some(EncodingKey::from_secret(config.secret.as_bytes())),
                DecodingKey::from_secret(config.secret.as_bytes()),
            ),
            JwtAlgorithm::Rs256 => {
                let pem = decode_public_key(&config.secret)?;
                let key = DecodingKey::from_rsa_pem(&pem)
                    .map_err(|e| JwtError::InvalidKey(e.to_string()))?;
                (None, key)
            }
        };

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Generates an access token. Only available with a shared secret.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::IssuingUnavailable` for RS256 and
    /// `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        sub: &str,
        company: &str,
        admin: bool,
    ) -> Result<String, JwtError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or(JwtError::IssuingUnavailable(self.config.algorithm))?;
        let expires_at = Utc::now() + Duration::minutes(self.config.access_token_expires_minutes);
        let claims = Claims::new(sub, company, admin, expires_at);

        encode(&Header::new(self.config.algorithm.into()), &claims, key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or the
    /// signature does not verify.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(self.config.algorithm.into());

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

/// Accepts a PEM block as-is or wrapped in standard base64.
fn decode_public_key(secret: &str) -> Result<Vec<u8>, JwtError> {
    let trimmed = secret.trim();
    if trimmed.starts_with("-----BEGIN") {
        return Ok(trimmed.as_bytes().to_vec());
    }
    Base64::decode_vec(trimmed).map_err(|e| JwtError::InvalidKey(e.to_string()))
}
