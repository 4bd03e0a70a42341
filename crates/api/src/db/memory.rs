//! In-memory implementation of every repository trait.
//!
//! One mutex guards the whole store, so each trait method is as atomic as a
//! database transaction: a multi-record mutation either happens entirely or
//! not at all. The test suite runs the full service stack against this
//! implementation; the `seed_user` helper stands in for the registration flow
//! the identity collaborator owns in production.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quickbite_core::{
    AddressId, MenuItemId, OrderId, OrderItemId, OrderStatus, RestaurantId, Role, UserId,
};

use super::{
    AddressRepository, CatalogRepository, OrderRepository, RepositoryError, UserRepository,
};
use crate::models::{
    Address, MenuItem, NewAddress, NewMenuItem, NewOrder, NewRestaurant, Order, OrderItem,
    Restaurant, User,
};

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    addresses: BTreeMap<i64, Address>,
    restaurants: BTreeMap<i64, Restaurant>,
    menu_items: BTreeMap<i64, MenuItem>,
    orders: BTreeMap<i64, Order>,
    next_user_id: i64,
    next_address_id: i64,
    next_restaurant_id: i64,
    next_menu_item_id: i64,
    next_order_id: i64,
    next_order_item_id: i64,
}

impl State {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// An in-memory database implementing all repository traits.
#[derive(Default)]
pub struct InMemoryDb {
    state: Mutex<State>,
}

impl InMemoryDb {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a user directly, standing in for the registration flow.
    pub fn seed_user(&self, name: &str, email: &str, roles: &[Role]) -> User {
        let mut state = self.lock();
        let id = State::next(&mut state.next_user_id);
        let now = Utc::now();
        let user = User {
            id: UserId::new(id),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: None,
            roles: roles.to_vec(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryDb {
    async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id.as_i64()).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: String,
        phone: Option<String>,
    ) -> Result<User, RepositoryError> {
        let mut state = self.lock();
        let user = state
            .users
            .get_mut(&id.as_i64())
            .ok_or(RepositoryError::NotFound)?;
        user.name = name;
        user.phone = phone;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl AddressRepository for InMemoryDb {
    async fn find(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        Ok(self.lock().addresses.get(&id.as_i64()).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        Ok(self
            .lock()
            .addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_default(&self, user_id: UserId) -> Result<Option<Address>, RepositoryError> {
        Ok(self
            .lock()
            .addresses
            .values()
            .find(|a| a.user_id == user_id && a.is_default)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: UserId,
        new: NewAddress,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError> {
        let mut state = self.lock();

        if let Some(previous) = clear_default
            && let Some(prev) = state.addresses.get_mut(&previous.as_i64())
        {
            prev.is_default = false;
            prev.updated_at = Utc::now();
        }

        let id = State::next(&mut state.next_address_id);
        let now = Utc::now();
        let address = Address {
            id: AddressId::new(id),
            user_id,
            street: new.street,
            city: new.city,
            state: new.state,
            zip_code: new.zip_code,
            instructions: new.instructions,
            is_default: new.is_default,
            created_at: now,
            updated_at: now,
        };
        state.addresses.insert(id, address.clone());
        Ok(address)
    }

    async fn update(
        &self,
        address: Address,
        clear_default: Option<AddressId>,
    ) -> Result<Address, RepositoryError> {
        let mut state = self.lock();

        if !state.addresses.contains_key(&address.id.as_i64()) {
            return Err(RepositoryError::NotFound);
        }

        if let Some(previous) = clear_default
            && let Some(prev) = state.addresses.get_mut(&previous.as_i64())
        {
            prev.is_default = false;
            prev.updated_at = Utc::now();
        }

        let stored = Address {
            updated_at: Utc::now(),
            ..address
        };
        state.addresses.insert(stored.id.as_i64(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        self.lock()
            .addresses
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryDb {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self.lock().restaurants.values().cloned().collect())
    }

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> Result<Option<Restaurant>, RepositoryError> {
        Ok(self.lock().restaurants.get(&id.as_i64()).cloned())
    }

    async fn restaurants_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self
            .lock()
            .restaurants
            .values()
            .filter(|r| r.cuisines.iter().any(|c| c == cuisine))
            .cloned()
            .collect())
    }

    async fn search_restaurants(&self, keyword: &str) -> Result<Vec<Restaurant>, RepositoryError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .lock()
            .restaurants
            .values()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.cuisines.iter().any(|c| c.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn insert_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let mut state = self.lock();
        let id = State::next(&mut state.next_restaurant_id);
        let now = Utc::now();
        let restaurant = Restaurant {
            id: RestaurantId::new(id),
            name: new.name,
            description: new.description,
            image: new.image,
            cuisines: new.cuisines,
            rating: new.rating,
            delivery_time: new.delivery_time,
            delivery_fee: new.delivery_fee,
            min_order: new.min_order,
            created_at: now,
            updated_at: now,
        };
        state.restaurants.insert(id, restaurant.clone());
        Ok(restaurant)
    }

    async fn update_restaurant(
        &self,
        id: RestaurantId,
        new: NewRestaurant,
    ) -> Result<Restaurant, RepositoryError> {
        let mut state = self.lock();
        let restaurant = state
            .restaurants
            .get_mut(&id.as_i64())
            .ok_or(RepositoryError::NotFound)?;
        restaurant.name = new.name;
        restaurant.description = new.description;
        restaurant.image = new.image;
        restaurant.cuisines = new.cuisines;
        restaurant.rating = new.rating;
        restaurant.delivery_time = new.delivery_time;
        restaurant.delivery_fee = new.delivery_fee;
        restaurant.min_order = new.min_order;
        restaurant.updated_at = Utc::now();
        Ok(restaurant.clone())
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), RepositoryError> {
        self.lock()
            .restaurants
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn menu_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        Ok(self
            .lock()
            .menu_items
            .values()
            .filter(|m| {
                m.restaurant_id == restaurant_id
                    && category.is_none_or(|c| m.category == c)
            })
            .cloned()
            .collect())
    }

    async fn find_menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        Ok(self.lock().menu_items.get(&id.as_i64()).cloned())
    }

    async fn insert_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let mut state = self.lock();
        let id = State::next(&mut state.next_menu_item_id);
        let now = Utc::now();
        let item = MenuItem {
            id: MenuItemId::new(id),
            restaurant_id: new.restaurant_id,
            name: new.name,
            description: new.description,
            price: new.price,
            image: new.image,
            category: new.category,
            available: new.available,
            created_at: now,
            updated_at: now,
        };
        state.menu_items.insert(id, item.clone());
        Ok(item)
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        new: NewMenuItem,
    ) -> Result<MenuItem, RepositoryError> {
        let mut state = self.lock();
        let item = state
            .menu_items
            .get_mut(&id.as_i64())
            .ok_or(RepositoryError::NotFound)?;
        item.name = new.name;
        item.description = new.description;
        item.price = new.price;
        item.image = new.image;
        item.category = new.category;
        item.available = new.available;
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        self.lock()
            .menu_items
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl OrderRepository for InMemoryDb {
    async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut state = self.lock();

        if state
            .orders
            .values()
            .any(|o| o.order_number == new.order_number)
        {
            return Err(RepositoryError::Conflict(
                "order number already exists".to_owned(),
            ));
        }

        let id = State::next(&mut state.next_order_id);
        let order_id = OrderId::new(id);
        let now = Utc::now();

        let mut items = Vec::with_capacity(new.items.len());
        for item in new.items {
            let item_id = State::next(&mut state.next_order_item_id);
            items.push(OrderItem {
                id: OrderItemId::new(item_id),
                order_id,
                menu_item_id: item.menu_item_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                subtotal: item.subtotal,
            });
        }

        let order = Order {
            id: order_id,
            order_number: new.order_number,
            status: new.status,
            user_id: new.user_id,
            restaurant_id: new.restaurant_id,
            delivery_address_id: new.delivery_address_id,
            items,
            subtotal: new.subtotal,
            delivery_fee: new.delivery_fee,
            service_fee: new.service_fee,
            total: new.total,
            payment_method: new.payment_method,
            payment_status: new.payment_status,
            estimated_delivery_time: new.estimated_delivery_time,
            created_at: now,
            updated_at: now,
            delivered_at: None,
        };
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock().orders.get(&id.as_i64()).cloned())
    }

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .values()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<Order, RepositoryError> {
        let mut state = self.lock();
        let order = state
            .orders
            .get_mut(&id.as_i64())
            .ok_or(RepositoryError::NotFound)?;
        order.status = status;
        if delivered_at.is_some() {
            order.delivered_at = delivered_at;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        // Items live inside the order aggregate here, so removing the order
        // removes them with it.
        self.lock()
            .orders
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
