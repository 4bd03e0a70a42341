//! Order aggregation and lifecycle.
//!
//! `create_order` is the aggregation engine: it resolves the restaurant,
//! the caller's delivery address and every requested menu item, snapshots
//! names, prices and the restaurant's delivery fee, and computes the totals
//! in exact decimal arithmetic. The assembled aggregate is handed to the
//! repository in one piece so persistence is all-or-nothing.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use quickbite_core::{OrderId, OrderStatus, RestaurantId, UserId};

use super::order_number;
use crate::db::{AddressRepository, CatalogRepository, OrderRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::models::{NewOrder, NewOrderItem, Order, OrderRequest};

/// Flat platform fee added to every order.
pub const SERVICE_FEE: Decimal = Decimal::from_parts(199, 0, 0, false, 2);

/// Default delivery estimate, in minutes.
pub const DEFAULT_ESTIMATED_DELIVERY_MINUTES: i32 = 30;

/// Initial payment status; capture happens upstream before the order reaches us.
const PAYMENT_STATUS_PAID: &str = "PAID";

/// How many fresh order numbers to try when the store reports a collision.
const ORDER_NUMBER_ATTEMPTS: u32 = 3;

/// Order creation, lookup and lifecycle transitions.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
    addresses: Arc<dyn AddressRepository>,
}

impl OrderService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        addresses: Arc<dyn AddressRepository>,
    ) -> Self {
        Self {
            orders,
            catalog,
            addresses,
        }
    }

    /// Create an order for `customer` from a client request.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty item list or a non-positive quantity.
    /// - `NotFound` if the restaurant or any menu item is unknown, or the
    ///   delivery address does not exist *for this customer*.
    pub async fn create_order(&self, customer: UserId, request: OrderRequest) -> Result<Order> {
        if request.items.is_empty() {
            return Err(ApiError::Validation(
                "order must contain at least one item".to_owned(),
            ));
        }
        if let Some(bad) = request.items.iter().find(|i| i.quantity <= 0) {
            return Err(ApiError::Validation(format!(
                "quantity must be positive for menu item {}",
                bad.menu_item_id
            )));
        }

        let restaurant = self
            .catalog
            .find_restaurant(request.restaurant_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("restaurant not found".to_owned()))?;

        // Ownership is part of the lookup: an address belonging to someone
        // else reads the same as one that does not exist.
        let address = self
            .addresses
            .find(request.delivery_address_id)
            .await?
            .filter(|a| a.user_id == customer)
            .ok_or_else(|| ApiError::NotFound("delivery address not found".to_owned()))?;

        let mut items = Vec::with_capacity(request.items.len());
        let mut subtotal = Decimal::ZERO;
        for line in &request.items {
            let menu_item = self
                .catalog
                .find_menu_item(line.menu_item_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("menu item not found".to_owned()))?;

            let line_subtotal = menu_item.price * Decimal::from(line.quantity);
            subtotal += line_subtotal;
            items.push(NewOrderItem {
                menu_item_id: menu_item.id,
                name: menu_item.name,
                price: menu_item.price,
                quantity: line.quantity,
                subtotal: line_subtotal,
            });
        }

        let delivery_fee = restaurant.delivery_fee;
        let total = subtotal + delivery_fee + SERVICE_FEE;

        // The 6-digit space collides eventually; the UNIQUE constraint
        // catches it and we draw again.
        let mut attempt = 0;
        loop {
            attempt += 1;
            let new = NewOrder {
                order_number: order_number::generate(),
                status: OrderStatus::Received,
                user_id: customer,
                restaurant_id: restaurant.id,
                delivery_address_id: address.id,
                items: items.clone(),
                subtotal,
                delivery_fee,
                service_fee: SERVICE_FEE,
                total,
                payment_method: request.payment_method,
                payment_status: PAYMENT_STATUS_PAID.to_owned(),
                estimated_delivery_time: DEFAULT_ESTIMATED_DELIVERY_MINUTES,
            };

            match self.orders.create(new).await {
                Ok(order) => {
                    tracing::info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        %customer,
                        total = %order.total,
                        "order created"
                    );
                    return Ok(order);
                }
                Err(RepositoryError::Conflict(_)) if attempt < ORDER_NUMBER_ATTEMPTS => {
                    tracing::warn!(attempt, "order number collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no order has this id.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.orders
            .find(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("order not found with id: {id}")))
    }

    /// Look an order up by its human-facing number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the number is unknown - never an empty success.
    pub async fn get_by_order_number(&self, order_number: &str) -> Result<Order> {
        self.orders
            .find_by_order_number(order_number)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("order not found with order number: {order_number}"))
            })
    }

    /// All orders the given customer has placed.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.orders.find_by_user(user_id).await?)
    }

    /// All orders a restaurant has received.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn orders_for_restaurant(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>> {
        Ok(self.orders.find_by_restaurant(restaurant_id).await?)
    }

    /// Drive the order lifecycle forward.
    ///
    /// Transitions follow the table on [`OrderStatus`]: one forward step at a
    /// time, cancellation from any non-terminal state, nothing out of a
    /// terminal state. Reaching `Delivered` stamps `delivered_at`; no other
    /// transition touches it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no order has this id.
    /// - `Validation` if the transition is not allowed.
    pub async fn update_status(&self, id: OrderId, new_status: OrderStatus) -> Result<Order> {
        let order = self.get_order(id).await?;

        if !order.status.can_transition_to(new_status) {
            return Err(ApiError::Validation(format!(
                "cannot move order from {} to {}",
                order.status, new_status
            )));
        }

        let delivered_at = (new_status == OrderStatus::Delivered).then(Utc::now);
        let updated = self.orders.update_status(id, new_status, delivered_at).await?;

        tracing::info!(
            order_id = %id,
            from = %order.status,
            to = %new_status,
            "order status updated"
        );
        Ok(updated)
    }

    /// Remove an order and its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no order has this id.
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        match self.orders.delete(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => {
                Err(ApiError::NotFound(format!("order not found with id: {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
