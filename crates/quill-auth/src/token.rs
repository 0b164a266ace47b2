//! Stateless signed session tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use quill_core::{Error, Result, Role};

/// Default token lifetime in hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner account id the token resolves to.
    pub sub: Uuid,
    /// Role captured at login. A role change requires a fresh login.
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds) = iat + lifetime.
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens.
///
/// Stateless: nothing is stored per token, so a captured token stays valid
/// until its expiry even after logout.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a service with the default 24h lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Create a service with an explicit lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Build from environment: AUTH_SECRET (required), TOKEN_TTL_HOURS
    /// (optional override).
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("AUTH_SECRET")
            .map_err(|_| Error::Config("AUTH_SECRET is not set".to_string()))?;
        let ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(TOKEN_TTL_HOURS);
        Ok(Self::with_ttl(&secret, Duration::hours(ttl_hours)))
    }

    /// Issue a signed token for the given owner identity.
    pub fn issue(&self, owner_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: owner_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        debug!(
            subsystem = "auth",
            component = "token",
            op = "issue",
            owner_id = %owner_id,
            "Issuing session token"
        );
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| Error::Token(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// Signature mismatch, malformed payload, and expiry all collapse into
    /// [`Error::Token`].
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::default();
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Token(e.to_string()))
    }
}
