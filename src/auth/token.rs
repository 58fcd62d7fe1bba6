//! HS256 bearer tokens carrying the authenticated username.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("'Authorization' header is missing")]
    MissingHeader,
    #[error("'Authorization' header value is malformed")]
    MalformedHeader,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to issue token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
}

/// A freshly issued token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies the bearer tokens used by every protected endpoint.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: std::time::Duration,
}

impl TokenManager {
    pub fn new(key: &str, expiration: std::time::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation: Validation::default(),
            expiration,
        }
    }

    /// Issue a token for `username`.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, AuthError> {
        let expires_at = Utc::now() + self.expiration;
        let claims = Claims {
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };
        let token =
            encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Issue)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Extract the token from an `Authorization` header value.
    pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
        header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)
    }
}
