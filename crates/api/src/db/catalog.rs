//! Catalog repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use quickbite_core::{MenuItemId, RestaurantId};

use super::{CatalogRepository, RepositoryError};
use crate::models::{MenuItem, NewMenuItem, NewRestaurant, Restaurant};

const RESTAURANT_COLUMNS: &str = r"id, name, description, image, cuisines, rating, delivery_time,
       delivery_fee, min_order, created_at, updated_at";

/// Repository for restaurant and menu-item database operations.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RestaurantRow::into_restaurant).collect())
    }

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> Result<Option<Restaurant>, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RestaurantRow::into_restaurant))
    }

    async fn restaurants_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE $1 = ANY(cuisines) ORDER BY name ASC"
        ))
        .bind(cuisine)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RestaurantRow::into_restaurant).collect())
    }

    async fn search_restaurants(&self, keyword: &str) -> Result<Vec<Restaurant>, RepositoryError> {
        let pattern = format!("%{keyword}%");
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            r"
            SELECT {RESTAURANT_COLUMNS} FROM restaurants
            WHERE name ILIKE $1
               OR EXISTS (SELECT 1 FROM unnest(cuisines) AS c WHERE c ILIKE $1)
            ORDER BY name ASC
            "
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RestaurantRow::into_restaurant).collect())
    }

    async fn insert_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            r"
            INSERT INTO restaurants (name, description, image, cuisines, rating, delivery_time,
                                     delivery_fee, min_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RESTAURANT_COLUMNS}
            "
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image)
        .bind(&new.cuisines)
        .bind(new.rating)
        .bind(&new.delivery_time)
        .bind(new.delivery_fee)
        .bind(new.min_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_restaurant())
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        new: NewRestaurant,
    ) -> Result<Restaurant, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            r"
            UPDATE restaurants
            SET name = $2, description = $3, image = $4, cuisines = $5, rating = $6,
                delivery_time = $7, delivery_fee = $8, min_order = $9, updated_at = now()
            WHERE id = $1
            RETURNING {RESTAURANT_COLUMNS}
            "
        ))
        .bind(id.as_i64())
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image)
        .bind(&new.cuisines)
        .bind(new.rating)
        .bind(&new.delivery_time)
        .bind(new.delivery_fee)
        .bind(new.min_order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into_restaurant())
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn menu_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, MenuItemRow>(
                    r"
                    SELECT id, restaurant_id, name, description, price, image, category,
                           available, created_at, updated_at
                    FROM menu_items
                    WHERE restaurant_id = $1 AND category = $2
                    ORDER BY name ASC
                    ",
                )
                .bind(restaurant_id.as_i64())
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MenuItemRow>(
                    r"
                    SELECT id, restaurant_id, name, description, price, image, category,
                           available, created_at, updated_at
                    FROM menu_items
                    WHERE restaurant_id = $1
                    ORDER BY category ASC, name ASC
                    ",
                )
                .bind(restaurant_id.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(MenuItemRow::into_item).collect())
    }

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, restaurant_id, name, description, price, image, category,
                   available, created_at, updated_at
            FROM menu_items
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MenuItemRow::into_item))
    }

    async fn insert_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            INSERT INTO menu_items (restaurant_id, name, description, price, image, category, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, restaurant_id, name, description, price, image, category,
                      available, created_at, updated_at
            ",
        )
        .bind(new.restaurant_id.as_i64())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(&new.category)
        .bind(new.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_item())
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        new: NewMenuItem,
    ) -> Result<MenuItem, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            UPDATE menu_items
            SET name = $2, description = $3, price = $4, image = $5, category = $6,
                available = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, restaurant_id, name, description, price, image, category,
                      available, created_at, updated_at
            ",
        )
        .bind(id.as_i64())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(&new.category)
        .bind(new.available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into_item())
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
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
struct RestaurantRow {
    id: i64,
    name: String,
    description: Option<String>,
    image: Option<String>,
    cuisines: Vec<String>,
    rating: Option<f64>,
    delivery_time: Option<String>,
    delivery_fee: Decimal,
    min_order: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RestaurantRow {
    fn into_restaurant(self) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(self.id),
            name: self.name,
            description: self.description,
            image: self.image,
            cuisines: self.cuisines,
            rating: self.rating,
            delivery_time: self.delivery_time,
            delivery_fee: self.delivery_fee,
            min_order: self.min_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    image: Option<String>,
    category: String,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuItemRow {
    fn into_item(self) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(self.id),
            restaurant_id: RestaurantId::new(self.restaurant_id),
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            available: self.available,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
