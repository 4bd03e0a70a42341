//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;

use quickbite_core::{OrderId, OrderStatus, RestaurantId, Role};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{MessageResponse, Order, OrderRequest};
use crate::state::AppState;

/// Create the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/user", get(user_orders))
        .route("/restaurant/{restaurant_id}", get(restaurant_orders))
        .route("/tracking/{order_number}", get(track_order))
        .route("/{id}/status", put(update_status))
        .route("/{id}", get(get_order).delete(delete_order))
}

/// Place a new order for the authenticated customer.
async fn create_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<OrderRequest>,
) -> Result<Json<Order>> {
    current.require_any(&[Role::User])?;
    let order = state.orders().create_order(current.id, request).await?;
    Ok(Json(order))
}

/// The caller's own order history.
async fn user_orders(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Order>>> {
    current.require_any(&[Role::User, Role::Admin])?;
    let orders = state.orders().orders_for_user(current.id).await?;
    Ok(Json(orders))
}

/// Orders received by a restaurant.
async fn restaurant_orders(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(restaurant_id): Path<RestaurantId>,
) -> Result<Json<Vec<Order>>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let orders = state.orders().orders_for_restaurant(restaurant_id).await?;
    Ok(Json(orders))
}

async fn get_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    current.require_any(&[Role::User, Role::Restaurant, Role::Admin])?;
    let order = state.orders().get_order(id).await?;
    Ok(Json(order))
}

/// Public tracking lookup by order number.
async fn track_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<Order>> {
    let order = state.orders().get_by_order_number(&order_number).await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: OrderStatus,
}

/// Advance an order through its lifecycle.
async fn update_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Order>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let order = state.orders().update_status(id, query.status).await?;
    Ok(Json(order))
}

/// Remove an order and its items.
async fn delete_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<MessageResponse>> {
    current.require_any(&[Role::Admin])?;
    state.orders().delete_order(id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
