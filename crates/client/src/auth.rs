//! Authentication service.
//!
//! One object owns the stored credential and exposes the decoded claims
//! through a single accessor. The storage mechanism behind the credential
//! is opaque ([`CredentialStore`]); decoding happens once per session.
//!
//! The backend is the authority on credential validity (signature checks
//! happen server-side); the client decodes claims for display/navigation
//! and performs only the deterministic time-window validation.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use warden_rbac::{Claims, validate_claims};

use crate::error::{ClientError, ClientResult};

/// Opaque credential persistence.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, credential: &str);
    fn clear(&self);
}

/// In-memory store; the default for tests and one-shot CLI invocations.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: Mutex<Option<String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.inner.lock().unwrap().clone()
    }

    fn store(&self, credential: &str) {
        *self.inner.lock().unwrap() = Some(credential.to_string());
    }

    fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }
}

/// The one authentication service of the console.
pub struct AuthSession {
    store: Arc<dyn CredentialStore>,
    claims: Mutex<Option<Claims>>,
}

impl AuthSession {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            claims: Mutex::new(None),
        }
    }

    /// Accept a fresh credential: decode, validate the time window, persist.
    pub fn sign_in(&self, credential: &str) -> ClientResult<Claims> {
        let claims = decode_claims(credential)?;
        validate_claims(&claims, Utc::now())
            .map_err(|e| ClientError::InvalidCredential(e.to_string()))?;

        self.store.store(credential);
        *self.claims.lock().unwrap() = Some(claims.clone());
        tracing::info!(user = %claims.sub, "session established");
        Ok(claims)
    }

    /// Resume from a previously stored credential, if any.
    pub fn resume(&self) -> ClientResult<Claims> {
        let credential = self.store.load().ok_or(ClientError::NotAuthenticated)?;
        let claims = decode_claims(&credential)?;
        validate_claims(&claims, Utc::now())
            .map_err(|e| ClientError::InvalidCredential(e.to_string()))?;

        *self.claims.lock().unwrap() = Some(claims.clone());
        Ok(claims)
    }

    /// Decoded claims of the active session.
    pub fn claims(&self) -> Option<Claims> {
        self.claims.lock().unwrap().clone()
    }

    /// Raw credential for the Authorization header.
    pub fn credential(&self) -> Option<String> {
        self.store.load()
    }

    pub fn has_permission(&self, key: &str) -> bool {
        self.claims()
            .map(|c| c.has_permission(key))
            .unwrap_or(false)
    }

    /// Drop the credential and claims. Called on any 401 from the backend.
    pub fn invalidate(&self) {
        self.store.clear();
        *self.claims.lock().unwrap() = None;
    }
}

/// Decode claims from a JWT without verifying its signature.
///
/// Signature verification is the backend's job; an invalid credential is
/// rejected server-side with 401.
fn decode_claims(credential: &str) -> ClientResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(
        credential,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| ClientError::InvalidCredential(e.to_string()))?;

    Ok(data.claims)
}
