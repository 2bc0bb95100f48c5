//! Authentication HTTP Handlers
//!
//! This module contains the HTTP handlers for every account-related
//! endpoint, split into focused submodules:
//!
//! - **`types`** - Request/response types shared by the handlers
//! - **`register`** - User registration
//! - **`login`** - Credential checking and session issuance
//! - **`verify`** - Email verification link consumption
//! - **`password`** - Password reset link request, validation, and consumption
//! - **`users`** - Session-guarded account endpoints
//!
//! # Endpoint Map
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/api/auth/register` | [`register`] |
//! | POST | `/api/auth/login` | [`login`] |
//! | GET | `/api/auth/{user_id}/verify/{token}` | [`verify_account`] |
//! | POST | `/api/password/reset-link` | [`send_reset_link`] |
//! | GET | `/api/password/reset/{user_id}/{token}` | [`validate_reset_link`] |
//! | POST | `/api/password/reset/{user_id}/{token}` | [`reset_password`] |
//! | GET | `/api/users/me` | [`get_me`] |
//! | GET | `/api/users` | [`list_accounts`] |
//! | GET | `/api/users/count` | [`count_accounts`] |

/// Request/response types for authentication endpoints
pub mod types;

/// User registration handler
pub mod register;

/// User login handler
pub mod login;

/// Email verification handler
pub mod verify;

/// Password reset handlers
pub mod password;

/// Session-guarded account handlers
pub mod users;

// Re-export the handlers for route wiring
pub use login::login;
pub use password::{reset_password, send_reset_link, validate_reset_link};
pub use register::register;
pub use users::{count_accounts, get_me, list_accounts};
pub use verify::verify_account;
