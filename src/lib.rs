//! Mosaic - Main Library
//!
//! Mosaic is a social media backend built with Rust, providing account
//! management with email verification, password resets, JWT sessions, and a
//! post feed with media attachments and likes.
//!
//! # Overview
//!
//! This library provides the core functionality for Mosaic, including:
//! - Token-gated email verification and password reset flows
//! - JWT session issuance and bearer-token middleware
//! - Post creation with remote media storage, editing, likes, and pagination
//! - PostgreSQL persistence behind storage traits
//!
//! # Module Structure
//!
//! - **`error`** - API and storage error types with HTTP mappings
//! - **`server`** - Application state, configuration, and initialization
//! - **`routes`** - Route definitions and router assembly
//! - **`auth`** - Accounts, action tokens, sessions, workflow, and handlers
//! - **`posts`** - Post model, storage, and handlers
//! - **`notify`** - Outbound email (SMTP via lettre) and link building
//! - **`media`** - Remote media upload/delete backend
//! - **`middleware`** - Session verification middleware and extractor
//! - **`testing`** - In-memory collaborators for tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use mosaic::server::{create_app, AppConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! // Use app with Axum server
//! # Ok(())
//! # }
//! ```

/// API and storage error types
pub mod error;

/// Application state, configuration, and initialization
pub mod server;

/// Route definitions and router assembly
pub mod routes;

/// Accounts, tokens, sessions, and authentication handlers
pub mod auth;

/// Post model, storage, and handlers
pub mod posts;

/// Outbound email and link building
pub mod notify;

/// Remote media storage
pub mod media;

/// Session middleware and extractor
pub mod middleware;

/// In-memory collaborators for tests; not part of the production build
#[cfg(any(test, feature = "testing"))]
pub mod testing;
