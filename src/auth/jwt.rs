//! JWT encoding and decoding for the session service.
//!
//! Two token classes share one signing key: short-lived access tokens
//! (stateless, never tracked) and long-lived refresh tokens (recorded as
//! outstanding and individually revocable by jti).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::errors::{AuthErrorKind, Error, Result};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Owning account id
    pub sub: String,
    /// Expiration time (unix seconds)
    pub exp: usize,
    /// Issued-at time (unix seconds)
    pub iat: usize,
    /// Unique token identifier, the blacklist key
    pub jti: String,
    /// Token class discriminator
    pub token_type: String,
}

impl Claims {
    pub fn account_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| Error::auth("Token contained an invalid subject", AuthErrorKind::InvalidToken))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp as i64, 0).single().unwrap_or_else(Utc::now)
    }
}

/// Token class discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// A freshly signed token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies both token classes.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact: no clock leeway on verification.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(config.access_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_ttl_seconds as i64),
        }
    }

    /// Sign a new token of the given class for an account.
    pub fn issue(&self, account_id: i64, token_type: TokenType) -> Result<IssuedToken> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: account_id.to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.as_str().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature and expiry of a token of either class.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| Error::auth("Token is invalid or expired", AuthErrorKind::InvalidToken))
    }

    /// Verify a token and require a specific class.
    pub fn decode_typed(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = self.decode(token)?;
        if claims.token_type != expected.as_str() {
            return Err(Error::auth(
                format!("Token has wrong type, expected '{}'", expected.as_str()),
                AuthErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}
