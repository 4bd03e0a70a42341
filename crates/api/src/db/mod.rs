//! Data access for the order backend.
//!
//! The core talks to storage exclusively through the repository traits below;
//! `PostgreSQL` implementations live in the sibling modules and an in-memory
//! implementation backs the test suite. Multi-record mutations (an order with
//! its items, the default-address swap, the order delete cascade) are single
//! trait methods so every implementation can make them atomic.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p quickbite-cli -- migrate
//! ```

pub mod addresses;
pub mod catalog;
pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::PgAddressRepository;
pub use catalog::PgCatalogRepository;
pub use memory::InMemoryDb;
pub use orders::PgOrderRepository;
pub use users::PgUserRepository;

use quickbite_core::{AddressId, MenuItemId, OrderId, OrderStatus, RestaurantId, UserId};

use crate::models::{
    Address, MenuItem, NewAddress, NewMenuItem, NewOrder, NewRestaurant, Order, Restaurant, User,
};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate order number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Storage for orders and their line items.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order together with all of its items as one atomic unit.
    ///
    /// Nothing may remain if any part of the write fails.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number is taken.
    async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError>;

    async fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError>;

    /// All orders placed by a user, newest first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// All orders received by a restaurant, newest first.
    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// Write a status transition. `delivered_at` is stored only when `Some`;
    /// an existing stamp is never cleared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<Order, RepositoryError>;

    /// Delete an order and, in the same transaction, every item it owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError>;
}

/// Storage for user delivery addresses.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError>;

    /// The user's current default address, if any.
    async fn find_default(&self, user_id: UserId) -> Result<Option<Address>, RepositoryError>;

    /// Insert a new address for `user_id`. When `clear_default` names the
    /// user's previous default, its flag is cleared in the same transaction
    /// as the insert.
    async fn insert(
        &self,
        user_id: UserId,
        new: NewAddress,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError>;

    /// Persist changed fields of an existing address. `clear_default` works
    /// as in [`Self::insert`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist.
    async fn update(
        &self,
        address: Address,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist.
    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError>;
}

/// Storage for restaurants and their menus.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RepositoryError>;

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> Result<Option<Restaurant>, RepositoryError>;

    /// Restaurants offering the given cuisine (exact tag match).
    async fn restaurants_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError>;

    /// Case-insensitive search over restaurant names and cuisine tags.
    async fn search_restaurants(&self, keyword: &str) -> Result<Vec<Restaurant>, RepositoryError>;

    async fn insert_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant doesn't exist.
    async fn update_restaurant(
        &self,
        id: RestaurantId,
        new: NewRestaurant,
    ) -> Result<Restaurant, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant doesn't exist.
    async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), RepositoryError>;

    /// A restaurant's menu, optionally filtered by category.
    async fn menu_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, RepositoryError>;

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    async fn insert_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the menu item doesn't exist.
    async fn update_menu_item(
        &self,
        id: MenuItemId,
        new: NewMenuItem,
    ) -> Result<MenuItem, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the menu item doesn't exist.
    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), RepositoryError>;
}

/// Storage for user records.
///
/// Registration is owned by the identity collaborator; this service only
/// reads users and updates profile fields.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    async fn update_profile(
        &self,
        id: UserId,
        name: String,
        phone: Option<String>,
    ) -> Result<User, RepositoryError>;
}
