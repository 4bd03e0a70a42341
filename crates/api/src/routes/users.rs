//! Profile and address route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use quickbite_core::{AddressId, Role};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{Address, MessageResponse, NewAddress, ProfileUpdate, User};
use crate::state::AppState;

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/addresses", get(addresses).post(add_address))
        .route(
            "/addresses/{id}",
            axum::routing::put(update_address).delete(delete_address),
        )
}

async fn profile(State(state): State<AppState>, current: CurrentUser) -> Result<Json<User>> {
    let user = state.accounts().profile(current.id).await?;
    Ok(Json(user))
}

async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    let user = state.accounts().update_profile(current.id, update).await?;
    Ok(Json(user))
}

async fn addresses(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Address>>> {
    current.require_any(&[Role::User, Role::Admin])?;
    let addresses = state.accounts().addresses(current.id).await?;
    Ok(Json(addresses))
}

async fn add_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new): Json<NewAddress>,
) -> Result<Json<Address>> {
    current.require_any(&[Role::User, Role::Admin])?;
    let address = state.accounts().add_address(current.id, new).await?;
    Ok(Json(address))
}

async fn update_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<AddressId>,
    Json(patch): Json<NewAddress>,
) -> Result<Json<Address>> {
    current.require_any(&[Role::User, Role::Admin])?;
    let address = state.accounts().update_address(current.id, id, patch).await?;
    Ok(Json(address))
}

async fn delete_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<AddressId>,
) -> Result<Json<MessageResponse>> {
    current.require_any(&[Role::User, Role::Admin])?;
    state.accounts().delete_address(current.id, id).await?;
    Ok(Json(MessageResponse::new("Address deleted successfully")))
}
