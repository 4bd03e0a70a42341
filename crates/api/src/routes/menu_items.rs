//! Menu-item route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use quickbite_core::{MenuItemId, RestaurantId, Role};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{MenuItem, MessageResponse, NewMenuItem};
use crate::state::AppState;

/// Create the menu-items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create))
        .route("/restaurant/{restaurant_id}", get(by_restaurant))
        .route(
            "/restaurant/{restaurant_id}/category/{category}",
            get(by_restaurant_and_category),
        )
        .route("/{id}", get(get_item).put(update).delete(delete_item))
}

async fn by_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<RestaurantId>,
) -> Result<Json<Vec<MenuItem>>> {
    let items = state
        .catalog()
        .menu_for_restaurant(restaurant_id, None)
        .await?;
    Ok(Json(items))
}

async fn by_restaurant_and_category(
    State(state): State<AppState>,
    Path((restaurant_id, category)): Path<(RestaurantId, String)>,
) -> Result<Json<Vec<MenuItem>>> {
    let items = state
        .catalog()
        .menu_for_restaurant(restaurant_id, Some(&category))
        .await?;
    Ok(Json(items))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Json<MenuItem>> {
    let item = state.catalog().get_menu_item(id).await?;
    Ok(Json(item))
}

async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new): Json<NewMenuItem>,
) -> Result<Json<MenuItem>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let item = state.catalog().create_menu_item(new).await?;
    Ok(Json(item))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<MenuItemId>,
    Json(new): Json<NewMenuItem>,
) -> Result<Json<MenuItem>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let item = state.catalog().update_menu_item(id, new).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<MenuItemId>,
) -> Result<Json<MessageResponse>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    state.catalog().delete_menu_item(id).await?;
    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}
