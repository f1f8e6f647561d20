// SPDX-License-Identifier: MIT

//! Token service: issues and verifies the two session token classes.
//!
//! Access tokens are short-lived and stateless. Refresh tokens are
//! longer-lived and mirrored on the user record so they can be invalidated
//! out-of-band; `issue_pair` performs that persistence. The two classes use
//! distinct secrets and lifetimes.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::Db;
use crate::error::AppError;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Token ID. Makes every issuance distinct, so rotation always yields
    /// a token that differs from the one it replaces.
    pub jti: String,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    access_secret: Vec<u8>,
    access_ttl_secs: i64,
    refresh_secret: Vec<u8>,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_secret: config.refresh_token_secret.clone(),
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    /// Sign a short-lived access token. No side effects.
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, AppError> {
        sign(user_id, &self.access_secret, self.access_ttl_secs)
    }

    /// Sign a longer-lived refresh token. No side effects.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, AppError> {
        sign(user_id, &self.refresh_secret, self.refresh_ttl_secs)
    }

    /// Verify an access token's signature and expiry.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.access_secret)
    }

    /// Verify a refresh token's signature and expiry.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        verify(token, &self.refresh_secret)
    }

    /// Issue a fresh access/refresh pair and persist the new refresh token
    /// onto the user record, superseding any previous one.
    pub fn issue_pair(&self, db: &Db, user_id: &str) -> Result<TokenPair, AppError> {
        let access_token = self.issue_access_token(user_id)?;
        let refresh_token = self.issue_refresh_token(user_id)?;

        let persisted = refresh_token.clone();
        db.update_by_id(user_id, move |user| user.refresh_token = Some(persisted))
            .map_err(|e| AppError::Issuance(format!("failed to persist refresh token: {e}")))?
            .ok_or_else(|| {
                AppError::Issuance(format!("user {user_id} vanished while persisting token"))
            })?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn sign(user_id: &str, secret: &[u8], ttl_secs: i64) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + ttl_secs) as usize,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Issuance(e.to_string()))
}

fn verify(token: &str, secret: &[u8]) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(e.to_string()))
}
