//! Action Tokens
//!
//! This module defines the single-use tokens that gate email verification
//! and password reset, together with their store contract.
//!
//! # Shape
//!
//! One token record serves both purposes; a token minted for verification is
//! equally consumable through the reset path and vice versa. This mirrors
//! the historic behavior of the system: issuing a reset token for an account
//! that already holds a verification token reuses the existing record, so
//! the two never coexist.
//!
//! # Lifetime
//!
//! A token lives from issuance until it is consumed. There is no expiry and
//! no garbage collection; an unconsumed token stays valid indefinitely.
//! Deletion is idempotent, so two racing consumers can both attempt the
//! delete and the loser simply deletes nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Number of random bytes in a token value; hex-encoded to 64 characters.
const TOKEN_BYTES: usize = 32;

/// A single-use proof of control over an account's email address
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActionToken {
    /// Record ID
    pub id: Uuid,
    /// Owning account
    pub account_id: Uuid,
    /// Opaque high-entropy value embedded in links
    pub value: String,
    /// Issuance timestamp
    pub created_at: DateTime<Utc>,
}

impl ActionToken {
    /// Mint a fresh token for an account
    pub fn issue(account_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            value: generate_value(),
            created_at: Utc::now(),
        }
    }
}

/// Generate an opaque token value from 32 bytes of OS randomness
pub fn generate_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Store contract for action tokens
///
/// `find_by_owner_and_value` must match on both fields exactly; a token
/// belonging to a different account never matches, whatever its value.
/// `delete` must succeed when the token is already gone.
///
/// Nothing here enforces at-most-one-token-per-account; two concurrent
/// issuers can both observe "absent" and both insert. The workflow accepts
/// that race rather than pretending the store serializes it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_owner(&self, account_id: Uuid) -> Result<Option<ActionToken>, StoreError>;
    async fn find_by_owner_and_value(
        &self,
        account_id: Uuid,
        value: &str,
    ) -> Result<Option<ActionToken>, StoreError>;
    async fn insert(&self, token: &ActionToken) -> Result<(), StoreError>;
    async fn delete(&self, token: &ActionToken) -> Result<(), StoreError>;
}

/// Postgres-backed token store
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_owner(&self, account_id: Uuid) -> Result<Option<ActionToken>, StoreError> {
        let token = sqlx::query_as::<_, ActionToken>(
            r#"
            SELECT id, account_id, value, created_at
            FROM action_tokens
            WHERE account_id = $1
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn find_by_owner_and_value(
        &self,
        account_id: Uuid,
        value: &str,
    ) -> Result<Option<ActionToken>, StoreError> {
        let token = sqlx::query_as::<_, ActionToken>(
            r#"
            SELECT id, account_id, value, created_at
            FROM action_tokens
            WHERE account_id = $1 AND value = $2
            "#,
        )
        .bind(account_id)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn insert(&self, token: &ActionToken) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO action_tokens (id, account_id, value, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.id)
        .bind(token.account_id)
        .bind(&token.value)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, token: &ActionToken) -> Result<(), StoreError> {
        // Deleting an already-absent row affects zero rows, which is fine.
        sqlx::query("DELETE FROM action_tokens WHERE id = $1")
            .bind(token.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
