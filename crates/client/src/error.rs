//! Client error taxonomy: transport, API status, decode, session expiry.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status other than 401.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Backend answered 401; the stored credential has been cleared.
    #[error("session expired: credential rejected by the backend")]
    SessionExpired,

    /// No credential available for an authenticated call.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The credential could not be decoded or failed claim validation.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// Response body did not match the expected shape.
    #[error("response decode error: {0}")]
    Decode(String),
}
