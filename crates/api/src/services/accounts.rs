//! User profiles and delivery addresses.
//!
//! Address operations enforce the single-default invariant: for any user, at
//! most one address carries `is_default = true`. Promoting an address first
//! locates the current default and clears it in the same repository
//! transaction that persists the promotion, so no interleaving can observe
//! two defaults.
//!
//! All lookups are ownership filtered. An address id that exists but belongs
//! to another user answers `NotFound`, indistinguishable from an id that was
//! never issued.

use std::sync::Arc;

use quickbite_core::{AddressId, UserId};

use crate::db::{AddressRepository, RepositoryError, UserRepository};
use crate::error::{ApiError, Result};
use crate::models::{Address, NewAddress, ProfileUpdate, User};

/// Profile reads/updates and the address invariant manager.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    addresses: Arc<dyn AddressRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, addresses: Arc<dyn AddressRepository>) -> Self {
        Self { users, addresses }
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the user no longer exists.
    pub async fn profile(&self, user_id: UserId) -> Result<User> {
        self.users
            .find(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))
    }

    /// Update the caller's display name and phone number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user no longer exists.
    pub async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<User> {
        if update.name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_owned()));
        }
        match self
            .users
            .update_profile(user_id, update.name, update.phone)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound) => {
                Err(ApiError::NotFound("user not found".to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All addresses the caller has saved.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn addresses(&self, user_id: UserId) -> Result<Vec<Address>> {
        Ok(self.addresses.find_by_user(user_id).await?)
    }

    /// A single address, provided it belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or owned by someone else.
    pub async fn address(&self, user_id: UserId, id: AddressId) -> Result<Address> {
        self.addresses
            .find(id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| {
                ApiError::NotFound("address not found or does not belong to current user".to_owned())
            })
    }

    /// Save a new address for the caller.
    ///
    /// When the new address is flagged default, the caller's previous default
    /// (if any) loses its flag in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank required fields.
    pub async fn add_address(&self, user_id: UserId, new: NewAddress) -> Result<Address> {
        validate_address(&new)?;

        let clear_default = if new.is_default {
            self.addresses.find_default(user_id).await?.map(|a| a.id)
        } else {
            None
        };

        Ok(self.addresses.insert(user_id, new, clear_default).await?)
    }

    /// Update one of the caller's addresses.
    ///
    /// Promoting an address to default demotes the previous default in the
    /// same transaction. Clearing the flag has no cascading effect; no other
    /// address is promoted in its place.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or owned by someone else.
    pub async fn update_address(
        &self,
        user_id: UserId,
        id: AddressId,
        patch: NewAddress,
    ) -> Result<Address> {
        validate_address(&patch)?;

        let current = self.address(user_id, id).await?;

        let becoming_default = patch.is_default && !current.is_default;
        let clear_default = if becoming_default {
            self.addresses
                .find_default(user_id)
                .await?
                .filter(|d| d.id != id)
                .map(|d| d.id)
        } else {
            None
        };

        let updated = Address {
            street: patch.street,
            city: patch.city,
            state: patch.state,
            zip_code: patch.zip_code,
            instructions: patch.instructions,
            is_default: patch.is_default,
            ..current
        };

        Ok(self.addresses.update(updated, clear_default).await?)
    }

    /// Delete one of the caller's addresses.
    ///
    /// Existing orders keep their snapshot reference; deleting an address
    /// never rewrites order history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or owned by someone else.
    pub async fn delete_address(&self, user_id: UserId, id: AddressId) -> Result<()> {
        // Ownership check first; the delete itself is by primary key.
        self.address(user_id, id).await?;

        match self.addresses.delete(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => {
                Err(ApiError::NotFound("address not found".to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_address(address: &NewAddress) -> Result<()> {
    for (field, value) in [
        ("street", &address.street),
        ("city", &address.city),
        ("state", &address.state),
        ("zipCode", &address.zip_code),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} must not be empty")));
        }
    }
    Ok(())
}
