//! Restaurant and menu management.
//!
//! Plain create/read/update/delete over the catalog collaborator; the order
//! engine consumes this data read-only.

use std::sync::Arc;

use quickbite_core::{MenuItemId, RestaurantId};

use crate::db::{CatalogRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::models::{MenuItem, NewMenuItem, NewRestaurant, Restaurant};

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        Ok(self.catalog.list_restaurants().await?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no restaurant has this id.
    pub async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant> {
        self.catalog
            .find_restaurant(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("restaurant not found with id: {id}")))
    }

    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn restaurants_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>> {
        Ok(self.catalog.restaurants_by_cuisine(cuisine).await?)
    }

    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn search_restaurants(&self, keyword: &str) -> Result<Vec<Restaurant>> {
        Ok(self.catalog.search_restaurants(keyword).await?)
    }

    /// # Errors
    ///
    /// Returns `Validation` for a blank name or negative fee.
    pub async fn create_restaurant(&self, new: NewRestaurant) -> Result<Restaurant> {
        validate_restaurant(&new)?;
        Ok(self.catalog.insert_restaurant(new).await?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no restaurant has this id.
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        new: NewRestaurant,
    ) -> Result<Restaurant> {
        validate_restaurant(&new)?;
        match self.catalog.update_restaurant(id, new).await {
            Ok(restaurant) => Ok(restaurant),
            Err(RepositoryError::NotFound) => Err(ApiError::NotFound(format!(
                "restaurant not found with id: {id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no restaurant has this id.
    pub async fn delete_restaurant(&self, id: RestaurantId) -> Result<()> {
        match self.catalog.delete_restaurant(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ApiError::NotFound(format!(
                "restaurant not found with id: {id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// A restaurant's menu, optionally narrowed to one category.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn menu_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>> {
        Ok(self.catalog.menu_for_restaurant(restaurant_id, category).await?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no menu item has this id.
    pub async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem> {
        self.catalog
            .find_menu_item(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("menu item not found with id: {id}")))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the owning restaurant does not exist.
    pub async fn create_menu_item(&self, new: NewMenuItem) -> Result<MenuItem> {
        validate_menu_item(&new)?;

        // The restaurant must exist before a dish can point at it.
        self.get_restaurant(new.restaurant_id).await?;

        Ok(self.catalog.insert_menu_item(new).await?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no menu item has this id.
    pub async fn update_menu_item(&self, id: MenuItemId, new: NewMenuItem) -> Result<MenuItem> {
        validate_menu_item(&new)?;
        match self.catalog.update_menu_item(id, new).await {
            Ok(item) => Ok(item),
            Err(RepositoryError::NotFound) => Err(ApiError::NotFound(format!(
                "menu item not found with id: {id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no menu item has this id.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<()> {
        match self.catalog.delete_menu_item(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ApiError::NotFound(format!(
                "menu item not found with id: {id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_restaurant(new: &NewRestaurant) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_owned()));
    }
    if new.delivery_fee.is_sign_negative() {
        return Err(ApiError::Validation(
            "deliveryFee must not be negative".to_owned(),
        ));
    }
    Ok(())
}

fn validate_menu_item(new: &NewMenuItem) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_owned()));
    }
    if new.category.trim().is_empty() {
        return Err(ApiError::Validation(
            "category must not be empty".to_owned(),
        ));
    }
    if new.price.is_sign_negative() {
        return Err(ApiError::Validation("price must not be negative".to_owned()));
    }
    Ok(())
}
