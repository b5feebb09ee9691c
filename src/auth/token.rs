//! # Bearer Token Issuing and Verification
//!
//! Tokens are HS256 JWTs carrying `{ email, iat, exp }`, signed with the
//! symmetric secret from configuration.
//!
//! ## Verification Flow
//! 1. Read the `Authorization` header (absent → `MissingToken`)
//! 2. Require the `Bearer <token>` form (anything else → `InvalidToken`)
//! 3. Check signature and expiry with zero leeway (failure → `InvalidToken`)
//!
//! Verification is pure: no database access happens here.

use crate::error::{AppError, AppResult};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// The verified caller, as handlers see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            email: claims.email,
        }
    }
}

/// Signs and verifies bearer tokens with one shared secret
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for `email`, valid from now for the configured window.
    pub fn issue(&self, email: &str) -> AppResult<String> {
        self.issue_at(email, Utc::now())
    }

    pub(crate) fn issue_at(&self, email: &str, now: DateTime<Utc>) -> AppResult<String> {
        let iat = now.timestamp();
        let claims = Claims {
            email: email.to_string(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired",
                    ErrorKind::InvalidSignature => "signature mismatch",
                    _ => "malformed token",
                };
                AppError::InvalidToken(reason.to_string())
            })
    }

    /// Extract and verify the bearer token of a request.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<Identity> {
        let value = headers.get(AUTHORIZATION).ok_or(AppError::MissingToken)?;

        let raw = value
            .to_str()
            .map_err(|_| AppError::InvalidToken("unreadable authorization header".to_string()))?;

        let token = match raw.trim().split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => {
                return Err(AppError::InvalidToken(
                    "expected 'Bearer <token>'".to_string(),
                ))
            }
        };

        if token.is_empty() {
            return Err(AppError::InvalidToken("empty token".to_string()));
        }

        self.verify(token).map(Identity::from)
    }
}
