//! Session Credentials
//!
//! This module handles JWT generation and validation for logged-in
//! sessions. The signing keys are derived once from configuration at
//! startup and injected wherever they are needed; nothing in here reads the
//! environment at call time.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::accounts::Account;
use crate::error::ApiError;

/// Session lifetime: 30 days
const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Privilege flag
    pub is_admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// HMAC keys for issuing and verifying session credentials
///
/// Built once from the configured secret; cloned freely into state.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed session credential for a verified account
    ///
    /// The credential carries the account id and the admin flag; handlers
    /// authorize owner/admin actions from these claims without a store
    /// round-trip.
    pub fn issue(&self, account: &Account) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ApiError::Upstream(format!("clock error: {e}")))?
            .as_secs();

        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            is_admin: account.is_admin,
            exp: now + SESSION_TTL_SECS,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Upstream(format!("failed to sign session token: {e}")))
    }

    /// Verify and decode a session credential
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::Unauthorized("Invalid token, access denied".to_string()))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(is_admin: bool) -> Account {
        let mut account = Account::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$2b$fakehash".to_string(),
        );
        account.is_admin = is_admin;
        account
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let keys = SessionKeys::new("test-secret");
        let account = test_account(false);

        let token = keys.issue(&account).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_carry_admin_flag() {
        let keys = SessionKeys::new("test-secret");
        let token = keys.issue(&test_account(true)).unwrap();
        assert!(keys.verify(&token).unwrap().is_admin);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let keys = SessionKeys::new("test-secret");
        assert!(keys.verify("invalid.token.here").is_err());
    }

    #[test]
    fn test_verify_rejects_token_signed_with_other_secret() {
        let keys_a = SessionKeys::new("secret-a");
        let keys_b = SessionKeys::new("secret-b");
        let token = keys_a.issue(&test_account(false)).unwrap();
        assert!(keys_b.verify(&token).is_err());
    }
}
