//! Server Initialization
//!
//! This module handles initialization of the Axum HTTP server: database
//! connection, migrations, collaborator wiring, and route configuration.
//!
//! # Initialization Process
//!
//! 1. Connect to PostgreSQL and run migrations
//! 2. Build the notifier (SMTP when configured, log-only otherwise)
//! 3. Build the media store (HTTP when configured, disabled otherwise)
//! 4. Assemble the account workflow and application state
//! 5. Create the router
//!
//! A missing notifier or media backend degrades the relevant feature but
//! does not prevent startup. A missing database is fatal.

use axum::Router;
use lettre::message::Mailbox;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::accounts::PgAccountStore;
use crate::auth::sessions::SessionKeys;
use crate::auth::tokens::PgTokenStore;
use crate::auth::workflow::AccountWorkflow;
use crate::media::{DisabledMediaStore, HttpMediaStore, MediaStore};
use crate::notify::{LinkBuilder, LogNotifier, Notifier, NotifyError, SmtpNotifier};
use crate::posts::store::PgPostStore;
use crate::routes::router::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid SMTP_FROM address: {0}")]
    FromAddress(#[from] lettre::address::AddressError),

    #[error("SMTP transport setup failed: {0}")]
    Smtp(#[from] NotifyError),
}

/// Create and configure the Axum application
///
/// Connects to the database, runs migrations, wires the storage and
/// notification collaborators, and returns a router ready to serve.
pub async fn create_app(config: &AppConfig) -> Result<Router, InitError> {
    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&config.database_url).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database ready");

    let accounts = Arc::new(PgAccountStore::new(pool.clone()));
    let tokens = Arc::new(PgTokenStore::new(pool.clone()));
    let posts = Arc::new(PgPostStore::new(pool));

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            let from = smtp.from.parse::<Mailbox>()?;
            Arc::new(SmtpNotifier::new(
                &smtp.host,
                smtp.username.clone(),
                smtp.password.clone(),
                from,
            )?)
        }
        None => Arc::new(LogNotifier),
    };

    let media: Arc<dyn MediaStore> = match &config.media {
        Some(media) => Arc::new(HttpMediaStore::new(
            media.api_url.clone(),
            media.api_key.clone(),
        )),
        None => Arc::new(DisabledMediaStore),
    };

    let sessions = SessionKeys::new(&config.jwt_secret);
    let links = LinkBuilder::new(config.client_domain.clone());

    let workflow = Arc::new(AccountWorkflow::new(
        accounts.clone(),
        tokens,
        notifier,
        links,
        sessions.clone(),
    ));

    let state = AppState {
        workflow,
        accounts,
        posts,
        media,
        sessions,
    };

    Ok(create_router(state))
}
