//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! qb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `QUICKBITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use thiserror::Error;

use quickbite_api::config::{ApiConfig, ConfigError};
use quickbite_api::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrateError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
