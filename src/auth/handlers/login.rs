//! Login Handler
//!
//! Implements `POST /api/auth/login`.
//!
//! # Authentication Process
//!
//! 1. Look up the account by email
//! 2. Verify the password with bcrypt
//! 3. Unverified account: re-send the verification email, no session
//! 4. Verified account: issue a session credential
//!
//! # Security Notes
//!
//! - Unknown email and wrong password return byte-identical responses
//! - Passwords are never logged or returned

use axum::{
    http::StatusCode,
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::auth::handlers::types::{AuthResponse, LoginRequest, MessageResponse, VERIFY_PROMPT};
use crate::auth::workflow::LoginOutcome;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid credentials (one message for both causes),
///   or a verification-required outcome for unverified accounts
/// * `500 Internal Server Error` - store or notifier failure
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    tracing::info!("Login request for: {}", request.email);

    match state
        .workflow
        .login(&request.email, &request.password)
        .await?
    {
        LoginOutcome::Session { token, account } => Ok((
            StatusCode::OK,
            Json(AuthResponse {
                token,
                user: account.into(),
            }),
        )
            .into_response()),
        LoginOutcome::VerificationRequired => Ok((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new(VERIFY_PROMPT)),
        )
            .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_account, TestHarness};

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_verified_returns_session() {
        let h = TestHarness::new();
        seed_account(&h, "alice", "alice@example.com", "password123", true).await;

        let response = login(
            State(h.state()),
            Json(request("alice@example.com", "password123")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_unverified_returns_prompt_not_session() {
        let h = TestHarness::new();
        seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        let response = login(
            State(h.state()),
            Json(request("alice@example.com", "password123")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["message"], VERIFY_PROMPT);
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let h = TestHarness::new();
        seed_account(&h, "alice", "alice@example.com", "password123", true).await;

        let result = login(
            State(h.state()),
            Json(request("alice@example.com", "nope12345")),
        )
        .await;

        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }
}
