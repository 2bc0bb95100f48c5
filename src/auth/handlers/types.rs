//! Authentication Handler Types
//!
//! Request and response types shared across the authentication handlers.

use serde::{Deserialize, Serialize};

use crate::auth::accounts::Account;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Chosen username (3-30 chars, starts with a letter)
    pub username: String,
    /// Email address, the account's contact
    pub email: String,
    /// Password (hashed before storage, never stored in clear)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password reset request (step one: ask for the link)
#[derive(Deserialize, Serialize, Debug)]
pub struct ResetLinkRequest {
    pub email: String,
}

/// Password reset request (step two: submit the new password)
#[derive(Deserialize, Serialize, Debug)]
pub struct NewPasswordRequest {
    pub password: String,
}

/// Login response: session credential plus the caller's account
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    /// Signed session credential (30-day expiration)
    pub token: String,
    /// Account information, without sensitive data
    pub user: AccountResponse,
}

/// Account shape returned to clients
///
/// Never includes the password hash.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub verified: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            is_admin: account.is_admin,
            verified: account.verified,
        }
    }
}

/// Plain message response
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Message shown when a verification email has been (re)sent
pub const VERIFY_PROMPT: &str = "We sent you an email, please verify your email address";
