//! Middleware Module
//!
//! Request-processing middleware for the backend. Currently this is the
//! session-credential check that guards the authenticated surface.

/// Session authentication middleware and extractors
pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
