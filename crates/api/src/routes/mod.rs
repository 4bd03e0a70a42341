//! HTTP route handlers for the order backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//!
//! # Orders
//! POST   /orders                        - Place an order            [USER]
//! GET    /orders/user                   - Caller's orders           [USER|ADMIN]
//! GET    /orders/restaurant/{id}        - A restaurant's orders     [RESTAURANT|ADMIN]
//! GET    /orders/{id}                   - Order by id               [USER|RESTAURANT|ADMIN]
//! GET    /orders/tracking/{number}      - Order by order number     (public)
//! PUT    /orders/{id}/status?status=    - Advance the lifecycle     [RESTAURANT|ADMIN]
//! DELETE /orders/{id}                   - Delete order + items      [ADMIN]
//!
//! # Users
//! GET    /users/profile                 - Caller's profile          (authenticated)
//! PUT    /users/profile                 - Update name/phone         (authenticated)
//! GET    /users/addresses               - Caller's addresses        [USER|ADMIN]
//! POST   /users/addresses               - Add address               [USER|ADMIN]
//! PUT    /users/addresses/{id}          - Update address            [USER|ADMIN]
//! DELETE /users/addresses/{id}          - Delete address            [USER|ADMIN]
//!
//! # Restaurants
//! GET    /restaurants                   - List all                  (public)
//! GET    /restaurants/{id}              - By id                     (public)
//! GET    /restaurants/cuisine/{cuisine} - By cuisine tag            (public)
//! GET    /restaurants/search?keyword=   - Search name/cuisine       (public)
//! POST   /restaurants                   - Create                    [RESTAURANT|ADMIN]
//! PUT    /restaurants/{id}              - Update                    [RESTAURANT|ADMIN]
//! DELETE /restaurants/{id}              - Delete                    [ADMIN]
//!
//! # Menu items
//! GET    /menu-items/restaurant/{id}    - A restaurant's menu       (public)
//! GET    /menu-items/restaurant/{id}/category/{category}            (public)
//! GET    /menu-items/{id}               - By id                     (public)
//! POST   /menu-items                    - Create                    [RESTAURANT|ADMIN]
//! PUT    /menu-items/{id}               - Update                    [RESTAURANT|ADMIN]
//! DELETE /menu-items/{id}               - Delete                    [RESTAURANT|ADMIN]
//! ```

pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Compose every resource router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/users", users::router())
        .nest("/restaurants", restaurants::router())
        .nest("/menu-items", menu_items::router())
}
