//! Notification Module
//!
//! This module owns outbound email: the `Notifier` contract, the SMTP
//! implementation built on lettre, the link builder that turns an account
//! and token into a client-facing URL, and the message bodies themselves.
//!
//! # Failure Policy
//!
//! A notifier failure fails the enclosing workflow operation; nothing here
//! retries. Registration can therefore succeed in the store while the
//! verification email was never sent, and the caller sees an error. That
//! inconsistency is accepted rather than compensated with a rollback.
//!
//! # Configuration
//!
//! SMTP settings are injected at construction. When SMTP is not configured
//! the server falls back to `LogNotifier`, which writes the message to the
//! log instead of sending it; useful for local development.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

/// Errors from message construction or delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid recipient address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Delivery refused (used by test doubles to inject faults)
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

/// Outbound message delivery contract
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SMTP notifier backed by lettre's async transport
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build a notifier against an SMTP relay with credentials
    pub fn new(
        host: &str,
        username: String,
        password: String,
        from: Mailbox,
    ) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(username, password))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        tracing::info!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}

/// Log-only notifier used when SMTP is not configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::warn!(
            "SMTP not configured; would send \"{}\" to {}: {}",
            subject,
            to,
            body
        );
        Ok(())
    }
}

/// Builds client-facing links from a configured base URL
///
/// Pure and stateless apart from the base URL; the same inputs always give
/// the same link.
#[derive(Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Link a user clicks to verify their email address
    pub fn verify_link(&self, account_id: Uuid, token_value: &str) -> String {
        format!("{}/users/{}/verify/{}", self.base_url, account_id, token_value)
    }

    /// Link a user clicks to open the password reset form
    pub fn reset_link(&self, account_id: Uuid, token_value: &str) -> String {
        format!(
            "{}/reset-password/{}/{}",
            self.base_url, account_id, token_value
        )
    }
}

/// Subject line for verification emails
pub const VERIFY_SUBJECT: &str = "Verify your email";

/// Subject line for password reset emails
pub const RESET_SUBJECT: &str = "Reset your password";

/// HTML body for a verification email
pub fn verification_email(link: &str) -> String {
    format!(
        r#"<div>
<p>Click the link below to verify your email address</p>
<a href="{link}">Verify</a>
</div>"#
    )
}

/// HTML body for a password reset email
pub fn reset_email(link: &str) -> String {
    format!(r#"<a href="{link}">Click here to reset your password</a>"#)
}
