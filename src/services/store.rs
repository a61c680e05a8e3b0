//! Credential store — the two reads the auth flow needs, behind a trait.
//!
//! ARCHITECTURE
//! ============
//! Token validation and session loading talk to `access_tokens` and `users`
//! only through [`CredentialStore`]. Production uses [`PgCredentialStore`];
//! tests swap in the in-memory store from [`test_helpers`].
//!
//! Expiry is compared against a `now` supplied by the caller's UTC clock,
//! never against the database session's local time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Minimal profile fields populated into a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

/// Transport or database failure. "Not found" is never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[source] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Unavailable(err.to_string()),
            other => Self::Db(other),
        }
    }
}

#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the owner of an unused token whose `expires_at` is after `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the lookup itself fails.
    async fn find_active_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Uuid>, StoreError>;

    /// Like [`CredentialStore::find_active_token`], but atomically marks the
    /// token used so it cannot authenticate again.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the update fails.
    async fn consume_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Uuid>, StoreError>;

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the lookup itself fails.
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_active_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query(
            r"SELECT user_id FROM access_tokens
              WHERE token = $1 AND used = false AND expires_at > $2
              LIMIT 1",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("user_id")))
    }

    async fn consume_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query(
            r"UPDATE access_tokens SET used = true
              WHERE token = $1 AND used = false AND expires_at > $2
              RETURNING user_id",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("user_id")))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, phone FROM users WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| User { id: r.get("id"), name: r.get("name"), phone: r.get("phone") }))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
