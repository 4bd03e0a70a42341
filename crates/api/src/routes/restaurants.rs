//! Restaurant route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use quickbite_core::{RestaurantId, Role};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{MessageResponse, NewRestaurant, Restaurant};
use crate::state::AppState;

/// Create the restaurants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/cuisine/{cuisine}", get(by_cuisine))
        .route(
            "/{id}",
            get(get_restaurant).put(update).delete(delete_restaurant),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Restaurant>>> {
    let restaurants = state.catalog().list_restaurants().await?;
    Ok(Json(restaurants))
}

async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Restaurant>> {
    let restaurant = state.catalog().get_restaurant(id).await?;
    Ok(Json(restaurant))
}

async fn by_cuisine(
    State(state): State<AppState>,
    Path(cuisine): Path<String>,
) -> Result<Json<Vec<Restaurant>>> {
    let restaurants = state.catalog().restaurants_by_cuisine(&cuisine).await?;
    Ok(Json(restaurants))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    keyword: String,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Restaurant>>> {
    let restaurants = state.catalog().search_restaurants(&query.keyword).await?;
    Ok(Json(restaurants))
}

async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new): Json<NewRestaurant>,
) -> Result<Json<Restaurant>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let restaurant = state.catalog().create_restaurant(new).await?;
    Ok(Json(restaurant))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<RestaurantId>,
    Json(new): Json<NewRestaurant>,
) -> Result<Json<Restaurant>> {
    current.require_any(&[Role::Restaurant, Role::Admin])?;
    let restaurant = state.catalog().update_restaurant(id, new).await?;
    Ok(Json(restaurant))
}

async fn delete_restaurant(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<RestaurantId>,
) -> Result<Json<MessageResponse>> {
    current.require_any(&[Role::Admin])?;
    state.catalog().delete_restaurant(id).await?;
    Ok(Json(MessageResponse::new("Restaurant deleted successfully")))
}
