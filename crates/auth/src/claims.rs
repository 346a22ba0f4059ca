//! Unverified JWT claim extraction.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use freshtrack_core::TenantId;

/// Claims we expect in an upstream-issued access token.
///
/// The subject doubles as the tenant id: each user account is its own tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl AccessClaims {
    /// The tenant this token acts for: `sub`, falling back to `user_id`.
    pub fn tenant_id(&self) -> Result<TenantId, AuthError> {
        let raw = self
            .sub
            .as_deref()
            .or(self.user_id.as_deref())
            .ok_or(AuthError::MissingSubject)?;

        raw.parse::<TenantId>().map_err(|_| AuthError::MissingSubject)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token is not three dot-separated base64url segments.
    #[error("invalid token format")]
    InvalidFormat,

    /// The payload segment is not base64url-encoded JSON.
    #[error("invalid token payload")]
    InvalidPayload,

    /// No usable user id claim (`sub` or `user_id`) was present.
    #[error("token carries no user id")]
    MissingSubject,
}

/// Decode a JWT payload **without verifying its signature**.
///
/// This is a deliberate, documented trust decision: upstream-issued tokens
/// are taken at face value and only their claims are extracted. Do not use
/// this on tokens from untrusted sources.
pub fn decode_unverified(token: &str) -> Result<AccessClaims, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidFormat);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| AuthError::InvalidPayload)?;

    serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidPayload)
}
