//! Account Verification Handler
//!
//! Implements `GET /api/auth/{user_id}/verify/{token}`, the endpoint the
//! emailed verification link points at (via the client app). Consuming the
//! link marks the account verified and destroys the token; a second visit
//! with the same link fails.

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::auth::handlers::types::MessageResponse;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Verification handler
///
/// # Errors
///
/// * `400 Bad Request` - unknown account, unknown token, or a token that
///   belongs to a different account; all three render identically
pub async fn verify_account(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.workflow.consume_verification(user_id, &token).await?;

    Ok(Json(MessageResponse::new("Your account has been verified")))
}
