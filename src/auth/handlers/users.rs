//! User Handlers
//!
//! Session-guarded account endpoints:
//!
//! - `GET /api/users/me` - the caller's own account
//! - `GET /api/users` - all accounts (admin only)
//! - `GET /api/users/count` - number of accounts (admin only)

use axum::{extract::State, response::Json};

use crate::auth::accounts::AccountStore;
use crate::auth::handlers::types::AccountResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

/// Current user handler
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .find_by_id(user.account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(account.into()))
}

/// Admin-only account listing
pub async fn list_accounts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    user.require_admin()?;

    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Admin-only account count
pub async fn count_accounts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require_admin()?;

    let count = state.accounts.count().await?;
    Ok(Json(serde_json::json!({ "count": count })))
}
