//! Registration Handler
//!
//! Implements `POST /api/auth/register`.
//!
//! # Registration Process
//!
//! 1. Validate username, email, and password shape
//! 2. Reject duplicate username or email
//! 3. Hash the password with bcrypt
//! 4. Insert the unverified account
//! 5. Issue a verification token and email the link
//!
//! The response never contains the token value or a session credential; the
//! only way to the token is the emailed link. If the email cannot be sent
//! the whole request fails, even though the account was already created;
//! there is no rollback, and a later login re-sends the link.

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::auth::accounts::{Account, AccountStore};
use crate::auth::handlers::types::{MessageResponse, RegisterRequest, VERIFY_PROMPT};
use crate::error::ApiError;
use crate::server::state::AppState;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Registration handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username/email/password, or duplicate account
/// * `500 Internal Server Error` - hashing, store, or notifier failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    tracing::info!("Registration request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(ApiError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !request.email.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if state
        .accounts
        .find_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::validation("Username already taken"));
    }
    if state.accounts.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::validation("User already exists"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ApiError::Upstream(format!("password hashing error: {e}")))?;

    let account = Account::new(request.username, request.email, password_hash);
    state.accounts.insert(&account).await?;

    state.workflow.issue_verification(&account).await?;

    tracing::info!("Account {} registered", account.id);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(VERIFY_PROMPT)),
    ))
}
