//! Server Configuration
//!
//! This module loads and validates server configuration from environment
//! variables.
//!
//! # Configuration Sources
//!
//! Configuration is loaded from environment variables. Three variables are
//! required and fail startup when absent:
//!
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `JWT_SECRET` - HMAC secret for session tokens
//! - `CLIENT_DOMAIN` - Base URL used when building emailed links
//!
//! The rest are optional and disable their feature when missing:
//!
//! - `SMTP_HOST` / `SMTP_USERNAME` / `SMTP_PASSWORD` / `SMTP_FROM` - outbound
//!   email; without a complete set, emails are logged instead of sent
//! - `MEDIA_API_URL` / `MEDIA_API_KEY` - remote media storage; without both,
//!   post uploads are rejected
//! - `SERVER_PORT` - listen port, defaults to 3000

use std::env;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

/// SMTP settings, present only when every SMTP variable is set
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Remote media storage settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub api_url: String,
    pub api_key: String,
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub client_domain: String,
    pub port: u16,
    pub smtp: Option<SmtpConfig>,
    pub media: Option<MediaConfig>,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or
    /// `SERVER_PORT` is not a valid port number. Incomplete optional
    /// groups (SMTP, media) are logged and treated as absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let jwt_secret = require("JWT_SECRET")?;
        let client_domain = require("CLIENT_DOMAIN")?;

        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar("SERVER_PORT", raw))?,
            Err(_) => 3000,
        };

        let smtp = Self::load_smtp();
        if smtp.is_none() {
            tracing::warn!("SMTP not configured, emails will be logged instead of sent");
        }

        let media = Self::load_media();
        if media.is_none() {
            tracing::warn!("Media storage not configured, post uploads will be rejected");
        }

        Ok(Self {
            database_url,
            jwt_secret,
            client_domain,
            port,
            smtp,
            media,
        })
    }

    fn load_smtp() -> Option<SmtpConfig> {
        Some(SmtpConfig {
            host: env::var("SMTP_HOST").ok()?,
            username: env::var("SMTP_USERNAME").ok()?,
            password: env::var("SMTP_PASSWORD").ok()?,
            from: env::var("SMTP_FROM").ok()?,
        })
    }

    fn load_media() -> Option<MediaConfig> {
        Some(MediaConfig {
            api_url: env::var("MEDIA_API_URL").ok()?,
            api_key: env::var("MEDIA_API_KEY").ok()?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
