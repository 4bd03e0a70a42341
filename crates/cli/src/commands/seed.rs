//! Seed the database with demo data.
//!
//! Inserts a couple of restaurants with menus plus demo users in each role,
//! so a fresh environment has something to order from. Safe to re-run: rows
//! are keyed on natural identifiers and skipped when already present.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use quickbite_api::config::{ApiConfig, ConfigError};
use quickbite_api::db;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert demo users, restaurants and menu items.
///
/// # Errors
///
/// Returns `SeedError` if configuration is missing or a write fails.
pub async fn run() -> Result<(), SeedError> {
    let config = ApiConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    seed_users(&pool).await?;
    seed_catalog(&pool).await?;

    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), SeedError> {
    let users: &[(&str, &str, &[&str])] = &[
        ("Demo Customer", "customer@example.com", &["USER"]),
        ("Demo Restaurant", "restaurant@example.com", &["RESTAURANT"]),
        ("Demo Admin", "admin@example.com", &["USER", "ADMIN"]),
    ];

    for &(name, email, roles) in users {
        let roles: Vec<String> = roles.iter().map(|r| (*r).to_owned()).collect();
        sqlx::query(
            r"
            INSERT INTO users (name, email, roles)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(name)
        .bind(email)
        .bind(&roles)
        .execute(pool)
        .await?;
        tracing::info!(email, "seeded user");
    }

    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), SeedError> {
    let restaurants = [
        (
            "Bella Napoli",
            "Wood-fired pizza and fresh pasta",
            vec!["Italian".to_owned(), "Pizza".to_owned()],
            Decimal::new(299, 2),
            "25-35 min",
            [
                ("Margherita Pizza", "Pizza", Decimal::new(1250, 2)),
                ("Spaghetti Carbonara", "Pasta", Decimal::new(1400, 2)),
                ("Tiramisu", "Dessert", Decimal::new(650, 2)),
            ],
        ),
        (
            "Golden Dragon",
            "Classic Cantonese kitchen",
            vec!["Chinese".to_owned()],
            Decimal::new(199, 2),
            "30-40 min",
            [
                ("Kung Pao Chicken", "Mains", Decimal::new(1150, 2)),
                ("Vegetable Spring Rolls", "Starters", Decimal::new(550, 2)),
                ("Fried Rice", "Sides", Decimal::new(850, 2)),
            ],
        ),
    ];

    for (name, description, cuisines, fee, delivery_time, menu) in restaurants {
        let restaurant_id: Option<i64> = sqlx::query_scalar(
            r"
            INSERT INTO restaurants (name, description, cuisines, delivery_fee, delivery_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            ",
        )
        .bind(name)
        .bind(description)
        .bind(&cuisines)
        .bind(fee)
        .bind(delivery_time)
        .fetch_optional(pool)
        .await?;

        let Some(restaurant_id) = restaurant_id else {
            tracing::info!(name, "restaurant already seeded, skipping");
            continue;
        };

        for (item_name, category, price) in menu {
            sqlx::query(
                r"
                INSERT INTO menu_items (restaurant_id, name, category, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(restaurant_id)
            .bind(item_name)
            .bind(category)
            .bind(price)
            .execute(pool)
            .await?;
        }

        tracing::info!(name, "seeded restaurant with menu");
    }

    Ok(())
}
