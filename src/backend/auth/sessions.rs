/**
 * Session Tokens
 *
 * This module issues and validates session pairs. A session pair is a
 * short-lived access token and a longer-lived refresh token, both HS256 JWTs
 * carrying the user id, email, issue time, expiry and token kind.
 *
 * Access and refresh tokens are signed with different secrets, so a refresh
 * token is never accepted where an access token is expected. Expiry is
 * checked with zero leeway. Nothing is stored server-side.
 */
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::error::AuthError;
use crate::backend::server::config::{JwtSettings, MAX_TOKEN_LIFETIME};

/// Which half of a session pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
    pub typ: TokenKind,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenInvalid)
    }
}

/// Freshly minted access and refresh tokens
#[derive(Debug, Clone)]
pub struct SessionPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: ChronoDuration,
    refresh_ttl: ChronoDuration,
}

impl TokenService {
    /// Build the service from the loaded JWT settings
    ///
    /// `Settings` rejects lifetimes above `MAX_TOKEN_LIFETIME`; longer values
    /// passed in directly are capped.
    pub fn new(settings: &JwtSettings) -> Self {
        let to_chrono = |d: std::time::Duration| {
            ChronoDuration::seconds(d.min(MAX_TOKEN_LIFETIME).as_secs() as i64)
        };
        Self {
            access: SigningKeys::from_secret(&settings.secret),
            refresh: SigningKeys::from_secret(&settings.refresh_secret),
            access_ttl: to_chrono(settings.expires_in),
            refresh_ttl: to_chrono(settings.refresh_expires_in),
        }
    }

    /// Issue a session pair valid from now
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<SessionPair, AuthError> {
        self.issue_pair_at(user_id, email, Utc::now())
    }

    /// Issue a session pair as if the current time were `now`
    pub fn issue_pair_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionPair, AuthError> {
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_token = sign(
            &self.access,
            &Claims {
                sub: user_id.to_string(),
                email: email.to_string(),
                iat: now.timestamp(),
                exp: access_expires_at.timestamp(),
                typ: TokenKind::Access,
            },
        )?;
        let refresh_token = sign(
            &self.refresh,
            &Claims {
                sub: user_id.to_string(),
                email: email.to_string(),
                iat: now.timestamp(),
                exp: refresh_expires_at.timestamp(),
                typ: TokenKind::Refresh,
            },
        )?;

        Ok(SessionPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Validate an access token and return its claims
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        verify(&self.access, token, TokenKind::Access)
    }

    /// Validate a refresh token and return its claims
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        verify(&self.refresh, token, TokenKind::Refresh)
    }
}

fn sign(keys: &SigningKeys, claims: &Claims) -> Result<String, AuthError> {
    encode(&Header::new(Algorithm::HS256), claims, &keys.encoding).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AuthError::TokenInvalid
    })
}

fn verify(keys: &SigningKeys, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?
        .claims;

    if claims.typ != expected {
        tracing::warn!("Rejected {:?} token presented as {:?}", claims.typ, expected);
        return Err(AuthError::TokenInvalid);
    }
    Ok(claims)
}
