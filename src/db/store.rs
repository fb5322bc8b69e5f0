//! Credential store contract shared by the Postgres and in-memory backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Store failures. A uniqueness violation is kept apart from everything else
/// so callers can answer with a conflict instead of a generic failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated ({constraint:?})")]
    UniqueViolation { constraint: Option<String> },

    #[error(transparent)]
    Db(sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().map(String::from),
                };
            }
        }
        StoreError::Db(err)
    }
}

/// Where user credentials live. Handlers only see this trait.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; the store assigns `id` and `created_at`.
    async fn insert_user(&self, user: &NewUser) -> Result<UserRow, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;
}
