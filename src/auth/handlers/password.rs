//! Password Reset Handlers
//!
//! The three steps of the reset flow:
//!
//! - `POST /api/password/reset-link` - email a reset link
//! - `GET /api/password/reset/{user_id}/{token}` - check the link is still
//!   valid before showing the form (no mutation)
//! - `POST /api/password/reset/{user_id}/{token}` - consume the link and
//!   set the new password
//!
//! The request step answers 404 for an unknown email. That deliberately
//! leaks which addresses have accounts, unlike login; someone asking for a
//! reset link for an address with no account needs to be told so.

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::auth::handlers::types::{MessageResponse, NewPasswordRequest, ResetLinkRequest};
use crate::error::ApiError;
use crate::server::state::AppState;

/// Request a reset link by email
///
/// # Errors
///
/// * `400 Bad Request` - malformed email
/// * `404 Not Found` - no account with this email
/// * `500 Internal Server Error` - store or notifier failure
pub async fn send_reset_link(
    State(state): State<AppState>,
    Json(request): Json<ResetLinkRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !request.email.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }

    state.workflow.request_password_reset(&request.email).await?;

    Ok(Json(MessageResponse::new(
        "Password reset link sent to your email address, check your inbox",
    )))
}

/// Check a reset link without consuming it
pub async fn validate_reset_link(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.workflow.validate_reset_link(user_id, &token).await?;

    Ok(Json(MessageResponse::new("Valid URL")))
}

/// Consume a reset link and set the new password
///
/// A successful reset also verifies the account; resetting proves control
/// of the email address.
pub async fn reset_password(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
    Json(request): Json<NewPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    state
        .workflow
        .consume_reset(user_id, &token, &request.password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset successfully, please log in",
    )))
}
