/// User store
///
/// The store exclusively owns user records. Uniqueness of email is a storage
/// guarantee (unique index, or a single critical section in the in-memory
/// test double), not an application-level check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;

mod postgres;

pub use postgres::PgUserStore;

/// A persisted user record. Immutable after creation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Exact-match lookup by email. Emails are normalized to lowercase
    /// before they reach the store, so this is effectively
    /// case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user and return it with its assigned id.
    ///
    /// Fails with `AuthError::DuplicateEmail` if the email is already taken,
    /// including when two registrations race: the decision is made where the
    /// record lives, atomically.
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> Result<User, AppError>;
}
