//! Authentication Module
//!
//! This module handles accounts, email verification, password resets, and
//! session management. It provides the HTTP handlers for the authentication
//! endpoints and the core workflow that drives the token-gated flows.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`accounts`** - Account model and storage operations
//! - **`tokens`** - Single-use action tokens for verification and resets
//! - **`sessions`** - JWT session issuance and validation
//! - **`workflow`** - Core verification/login/reset orchestration
//! - **`handlers`** - HTTP handlers for the authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── accounts.rs     - Account model and storage
//! ├── tokens.rs       - Action token model and storage
//! ├── sessions.rs     - JWT session management
//! ├── workflow.rs     - Account workflow orchestration
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     ├── verify.rs   - Email verification handler
//!     ├── password.rs - Password reset handlers
//!     └── users.rs    - Session-guarded account handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: Account created unverified → verification email sent
//! 2. **Verify**: Emailed link consumed → account marked verified → token removed
//! 3. **Login**: Credentials checked → verified accounts get a JWT session,
//!    unverified accounts get a fresh verification email instead
//! 4. **Reset**: Reset link requested → emailed link consumed → password
//!    replaced and account force-verified
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Action tokens are 32 random bytes, hex encoded, and single use
//! - Wrong email and wrong password produce identical login responses
//! - JWT sessions expire after 30 days

/// Account model and storage operations
pub mod accounts;

/// Single-use action tokens
pub mod tokens;

/// JWT session management
pub mod sessions;

/// Core account workflow
pub mod workflow;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use accounts::{Account, AccountStore};
pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest};
pub use handlers::{
    count_accounts, get_me, list_accounts, login, register, reset_password, send_reset_link,
    validate_reset_link, verify_account,
};
pub use sessions::SessionKeys;
pub use tokens::{ActionToken, TokenStore};
pub use workflow::{AccountWorkflow, LoginOutcome};
