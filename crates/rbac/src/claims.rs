//! Credential claims model (transport-agnostic).
//!
//! This is the set of claims the console expects once a credential has been
//! decoded by the client layer. Decoding lives in `warden-client`; claim
//! validation here is deterministic and pure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::UserId;

/// Decoded credential claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / user identifier.
    pub sub: UserId,

    /// Display name of the authenticated user.
    pub name: String,

    /// Permission keys granted to the user.
    pub permissions: Vec<String>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.iter().any(|p| p == key)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsValidationError {
    #[error("credential has expired")]
    Expired,

    #[error("credential not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid credential time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate decoded claims against `now`.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), ClaimsValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(ClaimsValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(ClaimsValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(ClaimsValidationError::Expired);
    }
    Ok(())
}
