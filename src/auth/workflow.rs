//! Verification and Password-Reset Workflow
//!
//! This module is the core of the backend: it orchestrates token issuance,
//! link construction, token consumption, and the account-state transitions
//! gated by token validity. Handlers translate HTTP into calls on
//! `AccountWorkflow`; everything stateful happens behind the store traits.
//!
//! # State Machines
//!
//! Per account (`verified` dimension):
//!
//! ```text
//! Unverified --[consume_verification ok]--> Verified
//! Unverified --[consume_reset ok]--------> Verified
//! Verified   --[consume_reset ok]--------> Verified   (idempotent)
//! ```
//!
//! No transition ever clears `verified`.
//!
//! Per token:
//!
//! ```text
//! Issued --[consume ok]-----------------> Deleted
//! Issued --[duplicate issue call]-------> Issued     (reused, no-op)
//! ```
//!
//! There is no expired state; tokens live until consumed.
//!
//! # Ordering
//!
//! Consumption persists the account mutation BEFORE deleting the token. A
//! crash between the two steps leaves a verified account with a stale,
//! still-consumable token; re-consuming it just sets `verified = true`
//! again, which is harmless. No cross-record transaction is used because
//! the stores only guarantee per-record atomicity.
//!
//! # Races
//!
//! Two concurrent issuers can both observe "no token" and both insert,
//! leaving two live tokens for one account. The store has no uniqueness
//! constraint and the workflow does not lock around the check; the race is
//! accepted and documented rather than half-fixed.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::accounts::{Account, AccountStore};
use crate::auth::sessions::SessionKeys;
use crate::auth::tokens::{ActionToken, TokenStore};
use crate::error::ApiError;
use crate::notify::{
    reset_email, verification_email, LinkBuilder, Notifier, RESET_SUBJECT, VERIFY_SUBJECT,
};

/// Outcome of a login attempt with correct credentials
#[derive(Debug)]
pub enum LoginOutcome {
    /// Account is verified; a signed session credential was issued
    Session { token: String, account: Account },
    /// Account is not verified; a verification email was (re)sent instead
    VerificationRequired,
}

/// Orchestrates account verification, login, and password reset
///
/// Construct once at startup with the real collaborators, or in tests with
/// the in-memory ones from `crate::testing`.
pub struct AccountWorkflow {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    links: LinkBuilder,
    sessions: SessionKeys,
}

impl AccountWorkflow {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        links: LinkBuilder,
        sessions: SessionKeys,
    ) -> Self {
        Self {
            accounts,
            tokens,
            notifier,
            links,
            sessions,
        }
    }

    /// Send (or re-send) a verification email for an account
    ///
    /// Reuses the account's existing unconsumed token when one exists;
    /// otherwise mints and persists a fresh one. At most one store insert
    /// happens per call. The token value leaves the system only inside the
    /// emailed link, never in a response.
    pub async fn issue_verification(&self, account: &Account) -> Result<(), ApiError> {
        let token = self.issue_or_reuse(account.id).await?;
        let link = self.links.verify_link(account.id, &token.value);

        self.notifier
            .send(&account.email, VERIFY_SUBJECT, &verification_email(&link))
            .await?;

        tracing::info!("Verification email queued for account {}", account.id);
        Ok(())
    }

    /// Consume a verification link and mark the account verified
    ///
    /// The token must match on BOTH the owning account and the value; a
    /// token issued to a different account never matches, whatever the
    /// value. An unknown account id and a bad token are indistinguishable
    /// to the caller.
    pub async fn consume_verification(
        &self,
        account_id: Uuid,
        token_value: &str,
    ) -> Result<(), ApiError> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let token = self
            .tokens
            .find_by_owner_and_value(account_id, token_value)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        // Account first, token second; see the module docs on ordering.
        account.verified = true;
        self.accounts.save(&account).await?;
        self.tokens.delete(&token).await?;

        tracing::info!("Account {} verified", account_id);
        Ok(())
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password fail identically. A correct login
    /// against an unverified account does not produce a session; it
    /// re-sends the verification email and reports that verification is
    /// still required.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| ApiError::Upstream(format!("password verification error: {e}")))?;
        if !valid {
            tracing::warn!("Failed login for account {}", account.id);
            return Err(ApiError::InvalidCredentials);
        }

        if !account.verified {
            self.issue_verification(&account).await?;
            return Ok(LoginOutcome::VerificationRequired);
        }

        let token = self.sessions.issue(&account)?;
        tracing::info!("Account {} logged in", account.id);
        Ok(LoginOutcome::Session { token, account })
    }

    /// Send a password reset link to an account's email address
    ///
    /// Unlike login, this path reports an unknown email as not found; the
    /// existence leak is deliberate. Token issuance follows the same
    /// reuse-or-mint logic as verification, against the same token record.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("No account with this email address"))?;

        let token = self.issue_or_reuse(account.id).await?;
        let link = self.links.reset_link(account.id, &token.value);

        self.notifier
            .send(&account.email, RESET_SUBJECT, &reset_email(&link))
            .await?;

        tracing::info!("Reset email queued for account {}", account.id);
        Ok(())
    }

    /// Check that a reset link is still valid, without consuming it
    ///
    /// Used by clients to decide whether to present the reset form. Pure
    /// existence check; no mutation.
    pub async fn validate_reset_link(
        &self,
        account_id: Uuid,
        token_value: &str,
    ) -> Result<(), ApiError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        self.tokens
            .find_by_owner_and_value(account_id, token_value)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        Ok(())
    }

    /// Consume a reset link and replace the account's password
    ///
    /// A successful reset also forces `verified = true`: completing it
    /// proves control of the email address just as well as the verification
    /// link does.
    pub async fn consume_reset(
        &self,
        account_id: Uuid,
        token_value: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let token = self
            .tokens
            .find_by_owner_and_value(account_id, token_value)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Upstream(format!("password hashing error: {e}")))?;

        account.password_hash = password_hash;
        account.verified = true;
        self.accounts.save(&account).await?;
        self.tokens.delete(&token).await?;

        tracing::info!("Password reset for account {}", account_id);
        Ok(())
    }

    /// Reuse the account's live token or mint and persist a new one
    async fn issue_or_reuse(&self, account_id: Uuid) -> Result<ActionToken, ApiError> {
        if let Some(existing) = self.tokens.find_by_owner(account_id).await? {
            return Ok(existing);
        }

        let token = ActionToken::issue(account_id);
        self.tokens.insert(&token).await?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_account, TestHarness};

    #[tokio::test]
    async fn test_issue_twice_keeps_one_live_token() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        h.workflow().issue_verification(&account).await.unwrap();
        h.workflow().issue_verification(&account).await.unwrap();

        // Second call reuses the first token: one live record, two emails.
        assert_eq!(h.tokens.live().len(), 1);
        assert_eq!(h.notifier.sent().len(), 2);
        let first = &h.notifier.sent()[0];
        let second = &h.notifier.sent()[1];
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn test_consume_rejects_token_of_other_account() {
        let h = TestHarness::new();
        let alice = seed_account(&h, "alice", "alice@example.com", "password123", false).await;
        let bob = seed_account(&h, "bob", "bob@example.com", "password123", false).await;

        h.workflow().issue_verification(&bob).await.unwrap();
        let bobs_token = h.tokens.live()[0].value.clone();

        let result = h.workflow().consume_verification(alice.id, &bobs_token).await;
        assert!(matches!(result, Err(ApiError::InvalidToken)));
        assert!(!h.accounts.get(alice.id).unwrap().verified);
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        h.workflow().issue_verification(&account).await.unwrap();
        let value = h.tokens.live()[0].value.clone();

        h.workflow()
            .consume_verification(account.id, &value)
            .await
            .unwrap();
        assert!(h.accounts.get(account.id).unwrap().verified);
        assert!(h.tokens.live().is_empty());

        // Second consumption must fail, and verified must stay true.
        let again = h.workflow().consume_verification(account.id, &value).await;
        assert!(matches!(again, Err(ApiError::InvalidToken)));
        assert!(h.accounts.get(account.id).unwrap().verified);
    }

    #[tokio::test]
    async fn test_login_unverified_never_yields_session() {
        let h = TestHarness::new();
        seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        let outcome = h
            .workflow()
            .login("alice@example.com", "password123")
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::VerificationRequired));
        // The side effect: a verification email went out.
        assert_eq!(h.notifier.sent().len(), 1);
        assert_eq!(h.tokens.live().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let h = TestHarness::new();
        seed_account(&h, "alice", "alice@example.com", "password123", true).await;

        let unknown = h
            .workflow()
            .login("nobody@example.com", "password123")
            .await;
        let wrong = h.workflow().login("alice@example.com", "wrongpass").await;

        let unknown = unknown.unwrap_err();
        let wrong = wrong.unwrap_err();
        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert!(matches!(wrong, ApiError::InvalidCredentials));
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.status_code(), wrong.status_code());
    }

    #[tokio::test]
    async fn test_login_verified_yields_session_with_claims() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", true).await;

        let outcome = h
            .workflow()
            .login("alice@example.com", "password123")
            .await
            .unwrap();
        match outcome {
            LoginOutcome::Session { token, account: a } => {
                assert_eq!(a.id, account.id);
                let claims = h.sessions.verify(&token).unwrap();
                assert_eq!(claims.sub, account.id.to_string());
            }
            LoginOutcome::VerificationRequired => panic!("expected a session"),
        }
    }

    #[tokio::test]
    async fn test_reset_changes_hash_and_verifies() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "oldpassword", false).await;
        let old_hash = h.accounts.get(account.id).unwrap().password_hash.clone();

        h.workflow()
            .request_password_reset("alice@example.com")
            .await
            .unwrap();
        let value = h.tokens.live()[0].value.clone();

        h.workflow()
            .consume_reset(account.id, &value, "hunter2NEW")
            .await
            .unwrap();

        let updated = h.accounts.get(account.id).unwrap();
        assert_ne!(updated.password_hash, old_hash);
        assert!(updated.verified);
        assert!(h.tokens.live().is_empty());

        // A login with the new secret must now take the verified path.
        let outcome = h
            .workflow()
            .login("alice@example.com", "hunter2NEW")
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::Session { .. }));
    }

    #[tokio::test]
    async fn test_reset_request_reports_unknown_email() {
        let h = TestHarness::new();
        let result = h.workflow().request_password_reset("nobody@example.com").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reset_reuses_verification_token() {
        // One token record serves both purposes: requesting a reset while a
        // verification token is live must not mint a second token.
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        h.workflow().issue_verification(&account).await.unwrap();
        let value = h.tokens.live()[0].value.clone();

        h.workflow()
            .request_password_reset("alice@example.com")
            .await
            .unwrap();
        assert_eq!(h.tokens.live().len(), 1);
        assert_eq!(h.tokens.live()[0].value, value);
    }

    #[tokio::test]
    async fn test_validate_reset_link_does_not_consume() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        h.workflow().issue_verification(&account).await.unwrap();
        let value = h.tokens.live()[0].value.clone();

        h.workflow()
            .validate_reset_link(account.id, &value)
            .await
            .unwrap();
        assert_eq!(h.tokens.live().len(), 1);

        let bad = h.workflow().validate_reset_link(account.id, "bogus").await;
        assert!(matches!(bad, Err(ApiError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_notifier_failure_fails_the_operation() {
        let h = TestHarness::new();
        let account = seed_account(&h, "alice", "alice@example.com", "password123", false).await;

        h.notifier.set_failing(true);
        let result = h.workflow().issue_verification(&account).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));

        // The token insert is not rolled back; the accepted inconsistency.
        assert_eq!(h.tokens.live().len(), 1);
    }
}
