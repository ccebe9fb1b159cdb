//! JWT Token Handler
//! Mission: Issue and validate signed identity tokens

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// Tokens are valid for one hour from issuance.
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Validly signed but past its expiry window.
    Expired,
    /// Bad signature, malformed, or missing claims.
    Invalid,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::Invalid => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    lifetime_secs: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with the process-wide signing secret.
    pub fn new(secret: String) -> Self {
        Self::with_lifetime(secret, TOKEN_LIFETIME_SECS)
    }

    /// Create a handler with an explicit token lifetime. A negative lifetime
    /// mints already-expired tokens, which the expiry tests rely on.
    pub fn with_lifetime(secret: String, lifetime_secs: i64) -> Self {
        Self {
            secret,
            lifetime_secs,
        }
    }

    /// Sign a token carrying the user's identity claims.
    pub fn issue(&self, user: &User) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::seconds(self.lifetime_secs))
            .context("Invalid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: expiration as usize,
        };

        debug!("Issuing JWT for user {} ({})", user.username, user.id);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign JWT")
    }

    /// Validate a token and extract its claims.
    ///
    /// The signature is checked before any claim is trusted. A validly
    /// signed but stale token is rejected as [`TokenError::Expired`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0; // exact one-hour window

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}
