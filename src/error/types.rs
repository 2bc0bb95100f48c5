//! Backend Error Types
//!
//! This module defines the error taxonomy for the backend. Every failure a
//! handler can surface maps to exactly one variant, and every variant maps
//! to exactly one HTTP status code.
//!
//! # Information Leakage
//!
//! Two variants deliberately collapse distinct causes into one message:
//!
//! - `InvalidCredentials` is returned both for an unknown email and for a
//!   wrong password, so a caller cannot probe which accounts exist.
//! - `InvalidToken` is returned both when the account in a link is unknown
//!   and when the token value does not match, so a caller cannot tell which
//!   half of the link was wrong.
//!
//! The password-reset request path is the one place that does leak account
//! existence (`NotFound` on unknown email); that asymmetry is intentional.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by the account and post stores.
///
/// Store implementations wrap their backend failures in this type so the
/// workflow and handlers never depend on a concrete backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from the Postgres-backed stores
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store unreachable or failing (used by test doubles to inject faults)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Backend error taxonomy
///
/// This enum represents all failures that can surface at the request
/// boundary. Each variant carries what the caller is allowed to see;
/// anything more specific is logged where the failure happened.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input; the message is surfaced verbatim to the caller
    #[error("{0}")]
    Validation(String),

    /// Account or resource absent
    #[error("{0}")]
    NotFound(String),

    /// Verification or reset link absent or mismatched
    ///
    /// Covers both an unknown account id and a token value that does not
    /// match; the caller cannot distinguish the two.
    #[error("Invalid link")]
    InvalidToken,

    /// Unknown account or wrong password, identical message for both
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing or invalid session credential
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but not allowed to act on this resource
    #[error("{0}")]
    Forbidden(String),

    /// A collaborator (store, notifier, media host) failed
    ///
    /// The inner detail is logged when the response is built; the caller
    /// only ever sees a generic server error.
    #[error("Internal server error")]
    Upstream(String),
}

impl ApiError {
    /// Create a validation error with a caller-visible message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error with a caller-visible message
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation`, `InvalidToken`, `InvalidCredentials` - 400 Bad Request
    /// - `NotFound` - 404 Not Found
    /// - `Unauthorized` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `Upstream` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the caller-visible message for this error
    ///
    /// `Upstream` always renders as a generic message; its detail is only
    /// available through logs.
    pub fn message(&self) -> String {
        match self {
            Self::Upstream(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Upstream(err.to_string())
    }
}
