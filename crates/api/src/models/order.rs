//! Order aggregate types and the order-creation request payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quickbite_core::{
    AddressId, MenuItemId, OrderId, OrderItemId, OrderStatus, PaymentMethod, RestaurantId, UserId,
};

/// The order aggregate root.
///
/// Financial fields are computed once at creation and never edited afterwards;
/// the only mutation an order sees is a status transition. `total` always
/// equals `subtotal + delivery_fee + service_fee`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-facing identifier, `ORD-` plus six digits. Unique and immutable.
    pub order_number: String,
    pub status: OrderStatus,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    /// The address chosen at order time. Later edits to the address do not
    /// alter this order.
    pub delivery_address_id: AddressId,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: String,
    /// Estimated delivery time in minutes.
    pub estimated_delivery_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A line on an order.
///
/// Name and price are snapshots of the menu item at order time, so later menu
/// edits never rewrite order history. Lives and dies with its order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(skip)]
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// A fully computed order ready to be persisted.
///
/// Produced by the aggregation engine; the repository stores it together with
/// its items as one atomic unit.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub status: OrderStatus,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub delivery_address_id: AddressId,
    pub items: Vec<NewOrderItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: String,
    pub estimated_delivery_time: i32,
}

/// A computed line item awaiting persistence.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// Client payload for `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub restaurant_id: RestaurantId,
    pub delivery_address_id: AddressId,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemRequest>,
}

/// One requested line: which menu item, how many.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_item_id: MenuItemId,
    pub quantity: i32,
}
