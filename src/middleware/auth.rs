//! Authentication Middleware
//!
//! Protects routes that require a logged-in session. Extracts the bearer
//! token from the Authorization header, verifies it against the injected
//! session keys, checks the account still exists, and attaches the caller's
//! identity to the request for handlers to consume via `AuthUser`.
//!
//! Owner-only and admin-only decisions are made in the handlers from the
//! attached claims; the middleware only establishes who is calling.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::accounts::AccountStore;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated caller identity extracted from the session credential
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Fail unless the caller is the given account or an admin
    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.account_id == owner_id || self.is_admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Access denied, owner or admin only".to_string(),
            ))
        }
    }

    /// Fail unless the caller is exactly the given account
    pub fn require_owner(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.account_id == owner_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Access denied, owner only".to_string()))
        }
    }

    /// Fail unless the caller is an admin
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Access denied, admin only".to_string(),
            ))
        }
    }
}

/// Authentication middleware
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the signature and expiry
/// 3. Confirms the account still exists in the store
/// 4. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 when the token is missing or invalid.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::Unauthorized("No token provided, access denied".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::Unauthorized("No token provided, access denied".to_string())
    })?;

    let claims = state.sessions.verify(token)?;

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid token, access denied".to_string()))?;

    // The credential may outlive the account; reject sessions for accounts
    // that no longer exist.
    state
        .accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Session for unknown account {}", account_id);
            ApiError::Unauthorized("Invalid token, access denied".to_string())
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        account_id,
        username: claims.username,
        is_admin: claims.is_admin,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated caller
///
/// Handlers behind `auth_middleware` take this as a parameter to get the
/// identity the middleware attached.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::Unauthorized("No token provided, access denied".to_string())
            })?;

        Ok(AuthUser(user))
    }
}
