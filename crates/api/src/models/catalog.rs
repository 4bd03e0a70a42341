//! Restaurant and menu-item domain types.
//!
//! The catalog is read-only from the order engine's point of view: orders
//! snapshot the fields they need (item name, price, the restaurant's delivery
//! fee) instead of holding live references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::{MenuItemId, RestaurantId};

/// A restaurant on the marketplace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub cuisines: Vec<String>,
    pub rating: Option<f64>,
    /// Display label such as "25-35 min"; distinct from the per-order
    /// estimated delivery time.
    pub delivery_time: Option<String>,
    pub delivery_fee: Decimal,
    pub min_order: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restaurant payload for create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    pub delivery_fee: Decimal,
    #[serde(default)]
    pub min_order: Option<Decimal>,
}

/// A dish offered by a restaurant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu-item payload for create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub restaurant_id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}
