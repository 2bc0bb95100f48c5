//! Account Model and Store
//!
//! This module defines the account record and the store contract it is
//! persisted through. Handlers and the workflow only ever see the
//! `AccountStore` trait; the Postgres implementation lives alongside it.
//!
//! # Lifecycle
//!
//! Accounts are created on registration with `verified = false`. The
//! `verified` flag is only ever flipped to `true` by a successful token
//! consumption (verification or password reset); no operation in this crate
//! clears it or deletes an account.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// An account record
///
/// The password is stored only as a bcrypt hash; the clear-text secret never
/// reaches the store. Responses to clients go through `AccountResponse`,
/// which drops the hash entirely.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, starts with a letter)
    pub username: String,
    /// Contact email address (unique)
    pub email: String,
    /// Bcrypt hash of the account's password
    pub password_hash: String,
    /// Privilege flag carried into session credentials
    pub is_admin: bool,
    /// Whether the email address has been verified
    pub verified: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh, unverified account from registration input
    ///
    /// `password_hash` must already be hashed by the caller.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_admin: false,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Store contract for account records
///
/// Lookups return `Ok(None)` rather than an error when the record is
/// absent. `save` is a whole-record upsert keyed by id; the backing store's
/// per-record atomicity is the only transactional guarantee relied upon.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;
    async fn save(&self, account: &Account) -> Result<(), StoreError>;
    async fn list(&self) -> Result<Vec<Account>, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

/// Postgres-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, is_admin, verified, created_at, updated_at";

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, is_admin, verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.is_admin)
        .bind(account.verified)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2, email = $3, password_hash = $4, is_admin = $5,
                verified = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.is_admin)
        .bind(account.verified)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
