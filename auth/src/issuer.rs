use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Longest accepted token lifetime, in seconds (100 years).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 36_500 * 86_400;

/// Access/refresh token pair returned by successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived, stateless access token
    pub access_token: String,
    /// Long-lived refresh token, tracked server-side
    pub refresh_token: String,
}

/// Token issuer errors.
#[derive(Debug, Clone, Error)]
pub enum TokenIssuerError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Token is invalid or expired: {0}")]
    InvalidOrExpired(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),
}

/// Issues and verifies HS256-signed access and refresh tokens.
///
/// Access tokens carry `sub`, `iat`, `exp` plus caller supplied claims.
/// Refresh tokens carry `sub`, `iat`, `exp` and a random `jti`, so two refresh
/// tokens for the same subject are never the same string.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret
    /// * `access_lifetime` - Lifetime of access tokens
    /// * `refresh_lifetime` - Lifetime of refresh tokens
    ///
    /// # Errors
    /// * `InvalidLifetime` - A lifetime is not strictly positive or exceeds
    ///   `MAX_TOKEN_LIFETIME_SECS`
    pub fn new(
        secret: &[u8],
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Result<Self, TokenIssuerError> {
        check_lifetime("access", access_lifetime)?;
        check_lifetime("refresh", refresh_lifetime)?;

        Ok(Self {
            jwt_handler: JwtHandler::new(secret),
            access_lifetime,
            refresh_lifetime,
        })
    }

    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// Issue an access token.
    ///
    /// # Arguments
    /// * `subject` - Identity identifier placed in `sub`
    /// * `extra_claims` - Named claims added to the token
    ///
    /// # Errors
    /// * `GenerationFailed` - Signing failed
    pub fn issue_access(
        &self,
        subject: &str,
        extra_claims: &[(&str, serde_json::Value)],
    ) -> Result<String, TokenIssuerError> {
        let claims = extra_claims.iter().fold(
            Claims::for_subject(subject, self.access_lifetime),
            |claims, (name, value)| claims.with_extra(*name, value),
        );

        self.sign(&claims)
    }

    /// Issue a refresh token.
    ///
    /// # Arguments
    /// * `subject` - Identity identifier placed in `sub`
    ///
    /// # Errors
    /// * `GenerationFailed` - Signing failed
    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenIssuerError> {
        let claims = Claims::for_subject(subject, self.refresh_lifetime).with_random_id();

        self.sign(&claims)
    }

    /// Issue an access token and a refresh token for the same subject.
    pub fn issue_pair(
        &self,
        subject: &str,
        extra_claims: &[(&str, serde_json::Value)],
    ) -> Result<TokenPair, TokenIssuerError> {
        Ok(TokenPair {
            access_token: self.issue_access(subject, extra_claims)?,
            refresh_token: self.issue_refresh(subject)?,
        })
    }

    /// Verify signature, algorithm and expiry of a token.
    ///
    /// # Returns
    /// Decoded claims; `sub` is guaranteed to be present
    ///
    /// # Errors
    /// * `InvalidOrExpired` - Token is malformed, forged, signed with another algorithm,
    ///   expired, or lacks a subject
    pub fn verify(&self, token: &str) -> Result<Claims, TokenIssuerError> {
        let claims: Claims = self
            .jwt_handler
            .decode(token)
            .map_err(|e| TokenIssuerError::InvalidOrExpired(e.to_string()))?;

        if claims.sub.is_none() {
            return Err(TokenIssuerError::InvalidOrExpired(
                JwtError::MissingClaim("sub".to_string()).to_string(),
            ));
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenIssuerError> {
        self.jwt_handler
            .encode(claims)
            .map_err(|e| TokenIssuerError::GenerationFailed(e.to_string()))
    }
}

fn check_lifetime(kind: &str, lifetime: Duration) -> Result<(), TokenIssuerError> {
    if lifetime <= Duration::zero() {
        return Err(TokenIssuerError::InvalidLifetime(format!(
            "{} token lifetime must be positive, got {}s",
            kind,
            lifetime.num_seconds()
        )));
    }
    // Expiry timestamps are computed from the current time on every issue.
    if lifetime.num_seconds() > MAX_TOKEN_LIFETIME_SECS
        || Utc::now().checked_add_signed(lifetime).is_none()
    {
        return Err(TokenIssuerError::InvalidLifetime(format!(
            "{} token lifetime must not exceed {}s, got {}s",
            kind,
            MAX_TOKEN_LIFETIME_SECS,
            lifetime.num_seconds()
        )));
    }
    Ok(())
}
