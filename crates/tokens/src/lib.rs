//! HS256 player tokens.
//!
//! A token carries the player's username, their platform and an expiry.
//! Tokens are stateless: anything that fails signature, algorithm or expiry
//! checks is simply not a token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tower_auth_models::{AuthError, Platform};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub username: String,
    pub platform: Platform,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(&self, username: &str, platform: Platform, ttl: Duration) -> Result<String, AuthError> {
        let claims = TokenClaims {
            username: username.to_string(),
            platform,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenEncoding { reason: e.to_string() })
    }

    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Rejected token");
                None
            }
        }
    }
}

pub fn encode_token(
    username: &str,
    platform: Platform,
    ttl: Duration,
    key: &str,
) -> Result<String, AuthError> {
    TokenSigner::new(key).issue(username, platform, ttl)
}

pub fn decode_token(token: &str, key: &str) -> Option<TokenClaims> {
    TokenSigner::new(key).verify(token)
}
