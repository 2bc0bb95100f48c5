//! Application State Management
//!
//! This module defines the application state structure and the `FromRef`
//! implementations for Axum state extraction.
//!
//! # Architecture
//!
//! The `AppState` struct serves as the central state container for the
//! application, holding:
//! - The account workflow (verification, login, password resets)
//! - Storage handles for accounts and posts
//! - The media store for post attachments
//! - JWT session keys
//!
//! # Thread Safety
//!
//! All collaborators are held behind `Arc` (or are cheaply cloneable), so
//! `AppState` can be cloned into every request handler. The storage handles
//! are trait objects, which lets tests swap the PostgreSQL implementations
//! for in-memory ones without touching the handlers.
//!
//! # State Extraction
//!
//! The `FromRef` implementations allow Axum extractors to pull specific
//! parts of the state without needing the entire `AppState`. This follows
//! Axum's recommended pattern for state management.

use axum::extract::FromRef;
use std::sync::Arc;

use crate::auth::accounts::AccountStore;
use crate::auth::sessions::SessionKeys;
use crate::auth::workflow::AccountWorkflow;
use crate::media::MediaStore;
use crate::posts::store::PostStore;

/// Application state shared across all request handlers
///
/// # Fields
///
/// * `workflow` - Orchestrates verification, login, and password resets
/// * `accounts` - Account storage
/// * `posts` - Post storage
/// * `media` - Upload/delete backend for post attachments
/// * `sessions` - JWT signing and verification keys
#[derive(Clone)]
pub struct AppState {
    /// Account workflow orchestrator
    ///
    /// Owns its own handles to the account and token stores plus the
    /// notifier, so handlers only need this one entry point for the
    /// token-gated flows.
    pub workflow: Arc<AccountWorkflow>,

    /// Account storage, used directly by handlers that read accounts
    /// outside the workflow (current-user lookup, admin listing)
    pub accounts: Arc<dyn AccountStore>,

    /// Post storage
    pub posts: Arc<dyn PostStore>,

    /// Media store for post attachments
    pub media: Arc<dyn MediaStore>,

    /// JWT session keys for issuing and verifying bearer tokens
    pub sessions: SessionKeys,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<AccountWorkflow> {
    fn from_ref(state: &AppState) -> Self {
        state.workflow.clone()
    }
}
