//! Router Assembly
//!
//! This module provides the main router creation function that combines the
//! public and protected route sets into a single Axum router.
//!
//! # Route Order
//!
//! 1. Public routes (auth, password reset, post reads)
//! 2. Protected routes, wrapped in the session middleware
//! 3. Fallback handler (404)
//!
//! The session middleware is attached with `route_layer` on the protected
//! router only, so unknown paths still produce a plain 404 rather than a
//! 401.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::auth_middleware;
use crate::routes::api_routes::{protected_routes, public_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    let protected = protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    public_routes()
        .merge(protected)
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
