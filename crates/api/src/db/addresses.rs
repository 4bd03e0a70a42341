//! Address repository backed by `PostgreSQL`.
//!
//! The default-address swap (clear the previous default, write the new one)
//! runs inside a single transaction; a partial swap is never observable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quickbite_core::{AddressId, UserId};

use super::{AddressRepository, RepositoryError};
use crate::models::{Address, NewAddress};

/// Repository for address database operations.
#[derive(Clone)]
pub struct PgAddressRepository {
    pool: PgPool,
}

impl PgAddressRepository {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn find(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, user_id, street, city, state, zip_code, instructions, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AddressRow::into_address))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, user_id, street, city, state, zip_code, instructions, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AddressRow::into_address).collect())
    }

    async fn find_default(&self, user_id: UserId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, user_id, street, city, state, zip_code, instructions, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE user_id = $1 AND is_default = TRUE
            ",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AddressRow::into_address))
    }

    async fn insert(
        &self,
        user_id: UserId,
        new: NewAddress,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if let Some(previous) = clear_default {
            sqlx::query(
                "UPDATE addresses SET is_default = FALSE, updated_at = now() WHERE id = $1",
            )
            .bind(previous.as_i64())
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(
            r"
            INSERT INTO addresses (user_id, street, city, state, zip_code, instructions, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, street, city, state, zip_code, instructions, is_default,
                      created_at, updated_at
            ",
        )
        .bind(user_id.as_i64())
        .bind(&new.street)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip_code)
        .bind(&new.instructions)
        .bind(new.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_address())
    }

    async fn update(
        &self,
        address: Address,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if let Some(previous) = clear_default {
            sqlx::query(
                "UPDATE addresses SET is_default = FALSE, updated_at = now() WHERE id = $1",
            )
            .bind(previous.as_i64())
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(
            r"
            UPDATE addresses
            SET street = $2, city = $3, state = $4, zip_code = $5,
                instructions = $6, is_default = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, street, city, state, zip_code, instructions, is_default,
                      created_at, updated_at
            ",
        )
        .bind(address.id.as_i64())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.instructions)
        .bind(address.is_default)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(row.into_address())
    }

    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i64,
    user_id: i64,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    instructions: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AddressRow {
    fn into_address(self) -> Address {
        Address {
            id: AddressId::new(self.id),
            user_id: UserId::new(self.user_id),
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            instructions: self.instructions,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
