//! User repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quickbite_core::{Role, UserId};

use super::{RepositoryError, UserRepository};
use crate::models::User;

/// Repository for user database operations.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, phone, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: String,
        phone: Option<String>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET name = $2, phone = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, roles, created_at, updated_at
            ",
        )
        .bind(id.as_i64())
        .bind(&name)
        .bind(&phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_user()
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let roles = self
            .roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
            })?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
