//! Error Conversion
//!
//! This module provides the `IntoResponse` implementation for `ApiError`,
//! allowing handlers to return errors directly.
//!
//! # Response Format
//!
//! Error responses are JSON with a single field:
//!
//! ```json
//! {
//!   "message": "Invalid email or password"
//! }
//! ```
//!
//! The same error variant always serializes to the same bytes, which is what
//! keeps the two `InvalidCredentials` causes indistinguishable on the wire.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Upstream detail is logged here, at the last point it is visible,
        // and never reaches the response body.
        if let ApiError::Upstream(detail) = &self {
            tracing::error!("Upstream failure: {}", detail);
        }

        let body = serde_json::json!({
            "message": self.message(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}
