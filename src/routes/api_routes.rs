//! API Route Configuration
//!
//! This module wires handlers to paths, split by whether a route needs a
//! session.
//!
//! # Routes
//!
//! ## Public
//! - `POST /api/auth/register` - User registration
//! - `POST /api/auth/login` - User login
//! - `GET /api/auth/{user_id}/verify/{token}` - Email verification
//! - `POST /api/password/reset-link` - Request a reset link
//! - `GET /api/password/reset/{user_id}/{token}` - Validate a reset link
//! - `POST /api/password/reset/{user_id}/{token}` - Set a new password
//! - `GET /api/posts` - List posts (paginated, filterable)
//! - `GET /api/posts/count` - Count posts
//! - `GET /api/posts/{id}` - Fetch a single post
//!
//! ## Protected (bearer session required)
//! - `GET /api/users/me` - Current user
//! - `GET /api/users` - List accounts (admin)
//! - `GET /api/users/count` - Count accounts (admin)
//! - `POST /api/posts` - Create a post (multipart upload)
//! - `PUT /api/posts/{id}` - Edit a post (owner)
//! - `PUT /api/posts/media/{id}` - Replace a post's media file (owner)
//! - `DELETE /api/posts/{id}` - Delete a post (owner or admin)
//! - `PUT /api/posts/like/{id}` - Toggle a like

use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::handlers::{
    count_accounts, get_me, list_accounts, login, register, reset_password, send_reset_link,
    validate_reset_link, verify_account,
};
use crate::posts::handlers::{
    create_post, delete_post, get_post, get_post_count, get_posts, toggle_like, update_post,
    update_post_media,
};
use crate::server::state::AppState;

/// Routes that do not require a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Authentication endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/{user_id}/verify/{token}", get(verify_account))
        // Password reset endpoints
        .route("/api/password/reset-link", post(send_reset_link))
        .route(
            "/api/password/reset/{user_id}/{token}",
            get(validate_reset_link).post(reset_password),
        )
        // Public post reads
        .route("/api/posts", get(get_posts))
        .route("/api/posts/count", get(get_post_count))
        .route("/api/posts/{id}", get(get_post))
}

/// Routes that require a valid bearer session
///
/// The session check itself is attached in [`create_router`], so this
/// router stays testable without the middleware.
///
/// [`create_router`]: crate::routes::router::create_router
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Account endpoints
        .route("/api/users/me", get(get_me))
        .route("/api/users", get(list_accounts))
        .route("/api/users/count", get(count_accounts))
        // Post writes
        .route("/api/posts", post(create_post))
        .route("/api/posts/{id}", put(update_post).delete(delete_post))
        .route("/api/posts/media/{id}", put(update_post_media))
        .route("/api/posts/like/{id}", put(toggle_like))
}
