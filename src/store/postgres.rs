use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::store::{User, UserStore};

/// Postgres-backed user store.
///
/// The `users` table carries a unique index on `email`; the insert below
/// surfaces a violation as `DuplicateEmail` via the `sqlx::Error`
/// conversion, which is what makes concurrent registrations safe.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = user.id, "user row inserted");

        Ok(user)
    }
}
