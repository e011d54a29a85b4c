//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying the user id and role, so requests
//! authorize without a database read. Refresh tokens are opaque; the
//! `user_sessions` table stores only their SHA-256.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use launchpad_core::roles::{Actor, Role};
use launchpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{env_or, ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` is required. `JWT_ACCESS_EXPIRY_MINS` defaults to 15 and
    /// `JWT_REFRESH_EXPIRY_DAYS` to 7.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", 15)?,
            refresh_token_expiry_days: env_or("JWT_REFRESH_EXPIRY_DAYS", 7)?,
        })
    }

    /// Access token lifetime, as reported to clients in `expires_in`.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// When a refresh token issued now stops working.
    pub fn refresh_expires_at(&self) -> Timestamp {
        Utc::now() + Duration::days(self.refresh_token_expiry_days)
    }

    /// Sign an access token for `actor`.
    pub fn issue_access_token(&self, actor: Actor) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: actor.id,
            role: actor.role,
            exp: iat + self.access_ttl_secs(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature and expiry and return the claims.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

/// A freshly minted refresh token. `plaintext` goes to the client, `hash` to
/// the database.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = Self::hash_of(&plaintext);
        Self { plaintext, hash }
    }

    /// Hex SHA-256 of a presented token, for lookup.
    pub fn hash_of(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trips_the_actor() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let token = config.issue_access_token(Actor::new(42, Role::Mentor)).unwrap();

        let claims = config.verify_access_token(&token).unwrap();
        assert_eq!(claims.actor(), Actor::new(42, Role::Mentor));
        assert_eq!(claims.exp - claims.iat, config.access_ttl_secs());
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        // Past the default 60 second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Entrepreneur,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(config.verify_access_token(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = config("secret-alpha")
            .issue_access_token(Actor::new(1, Role::Admin))
            .unwrap();
        assert!(config("secret-bravo").verify_access_token(&token).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_and_hashed() {
        let a = RefreshToken::generate();
        let b = RefreshToken::generate();
        assert_ne!(a.plaintext, b.plaintext);
        assert_eq!(a.hash, RefreshToken::hash_of(&a.plaintext));
        assert_eq!(a.hash.len(), 64);
        assert_ne!(a.hash, a.plaintext);
    }
}
