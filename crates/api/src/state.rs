//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::{
    PgAddressRepository, PgCatalogRepository, PgOrderRepository, PgUserRepository, UserRepository,
};
use crate::services::{AccountService, CatalogService, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// services, the user store (for identity resolution), configuration, and
/// the database pool (for readiness checks).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    users: Arc<dyn UserRepository>,
    orders: OrderService,
    accounts: AccountService,
    catalog: CatalogService,
}

impl AppState {
    /// Wire the service stack on top of a `PostgreSQL` pool.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
        let addresses = Arc::new(PgAddressRepository::new(pool.clone()));
        let catalog_repo = Arc::new(PgCatalogRepository::new(pool.clone()));
        let order_repo = Arc::new(PgOrderRepository::new(pool.clone()));

        let orders = OrderService::new(order_repo, catalog_repo.clone(), addresses.clone());
        let accounts = AccountService::new(users.clone(), addresses);
        let catalog = CatalogService::new(catalog_repo);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
                orders,
                accounts,
                catalog,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the user store (identity resolution).
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.inner.users
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
