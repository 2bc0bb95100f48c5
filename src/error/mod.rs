//! Error Module
//!
//! This module defines the error types used across the backend and their
//! conversion into HTTP responses.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definitions and status mapping
//! - **`conversion`** - Error conversion implementations (IntoResponse)
//!
//! # Error Taxonomy
//!
//! - `Validation` - Malformed input, surfaced verbatim to the caller (400)
//! - `NotFound` - Account or resource absent (404)
//! - `InvalidToken` - Verification/reset link absent or mismatched (400)
//! - `InvalidCredentials` - Unknown account or wrong password, one message (400)
//! - `Unauthorized` - Missing or invalid session credential (401)
//! - `Forbidden` - Caller is not the owner or an admin (403)
//! - `Upstream` - Store, notifier, or media host failure (500)
//!
//! # HTTP Response Conversion
//!
//! All errors implement `IntoResponse` from Axum, allowing them to be
//! returned directly from handlers. The response body is a JSON object with
//! a single `message` field; upstream failure detail is logged, never sent.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{ApiError, StoreError};
