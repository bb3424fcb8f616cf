//! Session tokens: HS256 JWTs carried in the HttpOnly `session` cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as TokenError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use roster_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// User id.
    pub sub: DbId,
    /// Shown in the navigation bar without a database round trip.
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and session lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Minutes a session stays valid after login (default: 60).
    pub access_token_expiry_mins: i64,
}

const DEFAULT_SESSION_MINS: i64 = 60;

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the lifetime is not a number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|v| {
                v.parse::<i64>()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64")
            })
            .unwrap_or(DEFAULT_SESSION_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Sign a session token for a user who just logged in.
    pub fn issue(&self, user_id: DbId, username: &str) -> Result<String, TokenError> {
        let issued = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            username: username.to_string(),
            exp: (issued + Duration::minutes(self.access_token_expiry_mins)).timestamp(),
            iat: issued.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check the signature and expiry of a session token.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
