//! Domain models for the order backend.
//!
//! These types represent validated domain objects separate from database row
//! types. Monetary amounts are `rust_decimal::Decimal` everywhere; floating
//! point never touches money.

pub mod catalog;
pub mod order;
pub mod user;

pub use catalog::{MenuItem, NewMenuItem, NewRestaurant, Restaurant};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderItemRequest, OrderRequest,
};
pub use user::{Address, NewAddress, ProfileUpdate, User};

use serde::Serialize;

/// Simple confirmation body returned by delete endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
