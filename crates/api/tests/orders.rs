//! Order lifecycle tests over the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use quickbite_api::db::InMemoryDb;
use quickbite_api::error::ApiError;
use quickbite_api::models::{
    MenuItem, NewAddress, NewMenuItem, NewRestaurant, OrderItemRequest, OrderRequest, Restaurant,
};
use quickbite_api::services::{AccountService, CatalogService, OrderService};
use quickbite_core::{AddressId, MenuItemId, OrderStatus, PaymentMethod, Role, UserId};

struct Fixture {
    db: Arc<InMemoryDb>,
    orders: OrderService,
    accounts: AccountService,
    catalog: CatalogService,
}

fn fixture() -> Fixture {
    let db = Arc::new(InMemoryDb::new());
    let orders = OrderService::new(db.clone(), db.clone(), db.clone());
    let accounts = AccountService::new(db.clone(), db.clone());
    let catalog = CatalogService::new(db.clone());
    Fixture {
        db,
        orders,
        accounts,
        catalog,
    }
}

fn new_restaurant(name: &str, delivery_fee: Decimal) -> NewRestaurant {
    NewRestaurant {
        name: name.to_owned(),
        description: None,
        image: None,
        cuisines: vec!["Italian".to_owned()],
        rating: None,
        delivery_time: Some("25-35 min".to_owned()),
        delivery_fee,
        min_order: None,
    }
}

fn new_menu_item(restaurant: &Restaurant, name: &str, price: Decimal) -> NewMenuItem {
    NewMenuItem {
        restaurant_id: restaurant.id,
        name: name.to_owned(),
        description: None,
        price,
        image: None,
        category: "Mains".to_owned(),
        available: true,
    }
}

fn home_address() -> NewAddress {
    NewAddress {
        street: "12 Elm Street".to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zip_code: "62704".to_owned(),
        instructions: Some("ring twice".to_owned()),
        is_default: true,
    }
}

/// Seeds a customer with an address, a restaurant and two dishes priced
/// 8.50 and 3.00, delivery fee 2.99.
async fn seed_order_world(fx: &Fixture) -> (UserId, AddressId, Restaurant, MenuItem, MenuItem) {
    let customer = fx.db.seed_user("Ada", "ada@example.com", &[Role::User]);
    let address = fx
        .accounts
        .add_address(customer.id, home_address())
        .await
        .unwrap();
    let restaurant = fx
        .catalog
        .create_restaurant(new_restaurant("Bella Napoli", Decimal::new(299, 2)))
        .await
        .unwrap();
    let pizza = fx
        .catalog
        .create_menu_item(new_menu_item(&restaurant, "Margherita", Decimal::new(850, 2)))
        .await
        .unwrap();
    let soda = fx
        .catalog
        .create_menu_item(new_menu_item(&restaurant, "Lemon Soda", Decimal::new(300, 2)))
        .await
        .unwrap();
    (customer.id, address.id, restaurant, pizza, soda)
}

#[tokio::test]
async fn create_order_computes_exact_totals() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, soda) = seed_order_world(&fx).await;

    let order = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::CreditCard,
                items: vec![
                    OrderItemRequest {
                        menu_item_id: pizza.id,
                        quantity: 2,
                    },
                    OrderItemRequest {
                        menu_item_id: soda.id,
                        quantity: 1,
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(order.subtotal, Decimal::new(2000, 2));
    assert_eq!(order.delivery_fee, Decimal::new(299, 2));
    assert_eq!(order.service_fee, Decimal::new(199, 2));
    assert_eq!(order.total, Decimal::new(2498, 2));
    assert_eq!(order.total, order.subtotal + order.delivery_fee + order.service_fee);
    assert_eq!(order.status, OrderStatus::Received);
    assert_eq!(order.payment_status, "PAID");
    assert_eq!(order.estimated_delivery_time, 30);
    assert_eq!(order.items.len(), 2);

    let pizza_line = &order.items[0];
    assert_eq!(pizza_line.name, "Margherita");
    assert_eq!(pizza_line.price, Decimal::new(850, 2));
    assert_eq!(pizza_line.quantity, 2);
    assert_eq!(pizza_line.subtotal, Decimal::new(1700, 2));

    let number = order.order_number.strip_prefix("ORD-").unwrap();
    assert_eq!(number.len(), 6);
    assert!(number.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn unknown_menu_item_persists_nothing() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, _) = seed_order_world(&fx).await;

    let err = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::Cash,
                items: vec![
                    OrderItemRequest {
                        menu_item_id: pizza.id,
                        quantity: 1,
                    },
                    OrderItemRequest {
                        menu_item_id: MenuItemId::new(9999),
                        quantity: 1,
                    },
                ],
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
    // Atomicity: the failed request left no order behind.
    assert!(fx.orders.orders_for_user(customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn order_request_validation() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, _) = seed_order_world(&fx).await;

    let empty = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::Cash,
                items: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(empty, ApiError::Validation(_)));

    let zero_quantity = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::Cash,
                items: vec![OrderItemRequest {
                    menu_item_id: pizza.id,
                    quantity: 0,
                }],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(zero_quantity, ApiError::Validation(_)));
}

#[tokio::test]
async fn foreign_address_reads_as_not_found() {
    let fx = fixture();
    let (_, _, restaurant, pizza, _) = seed_order_world(&fx).await;

    let other = fx.db.seed_user("Eve", "eve@example.com", &[Role::User]);
    let other_address = fx
        .accounts
        .add_address(other.id, home_address())
        .await
        .unwrap();

    let customer = fx.db.seed_user("Bob", "bob@example.com", &[Role::User]);
    let err = fx
        .orders
        .create_order(
            customer.id,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: other_address.id,
                payment_method: PaymentMethod::Paypal,
                items: vec![OrderItemRequest {
                    menu_item_id: pizza.id,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn tracking_unknown_order_number_is_not_found() {
    let fx = fixture();
    let err = fx.orders.get_by_order_number("ORD-000001").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

async fn place_order(fx: &Fixture) -> quickbite_api::models::Order {
    let (customer, address, restaurant, pizza, _) = seed_order_world(fx).await;
    fx.orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::CreditCard,
                items: vec![OrderItemRequest {
                    menu_item_id: pizza.id,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn delivered_stamps_delivered_at_once() {
    let fx = fixture();
    let order = place_order(&fx).await;

    let order = fx
        .orders
        .update_status(order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert!(order.delivered_at.is_none());

    let order = fx
        .orders
        .update_status(order.id, OrderStatus::Ready)
        .await
        .unwrap();
    let order = fx
        .orders
        .update_status(order.id, OrderStatus::OutForDelivery)
        .await
        .unwrap();
    assert!(order.delivered_at.is_none());

    let order = fx
        .orders
        .update_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn transition_table_is_enforced() {
    let fx = fixture();
    let order = place_order(&fx).await;

    // No skipping straight to delivered.
    let err = fx
        .orders
        .update_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Cancellation works from any non-terminal state...
    let cancelled = fx
        .orders
        .update_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.delivered_at.is_none());

    // ...and terminal states accept nothing further.
    let err = fx
        .orders
        .update_status(order.id, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn menu_edits_do_not_rewrite_history() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, _) = seed_order_world(&fx).await;

    let order = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::Cash,
                items: vec![OrderItemRequest {
                    menu_item_id: pizza.id,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();

    // Reprice the dish after the fact.
    fx.catalog
        .update_menu_item(
            pizza.id,
            new_menu_item(&restaurant, "Margherita Deluxe", Decimal::new(1999, 2)),
        )
        .await
        .unwrap();

    let reloaded = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(reloaded.items[0].name, "Margherita");
    assert_eq!(reloaded.items[0].price, Decimal::new(850, 2));
    assert_eq!(reloaded.total, order.total);
}

#[tokio::test]
async fn address_deletion_leaves_orders_untouched() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, _) = seed_order_world(&fx).await;

    let order = fx
        .orders
        .create_order(
            customer,
            OrderRequest {
                restaurant_id: restaurant.id,
                delivery_address_id: address,
                payment_method: PaymentMethod::Cash,
                items: vec![OrderItemRequest {
                    menu_item_id: pizza.id,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();

    fx.accounts.delete_address(customer, address).await.unwrap();

    let reloaded = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(reloaded.delivery_address_id, address);
}

#[tokio::test]
async fn delete_order_removes_the_aggregate() {
    let fx = fixture();
    let order = place_order(&fx).await;

    fx.orders.delete_order(order.id).await.unwrap();

    let err = fx.orders.get_order(order.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Deleting again reports not found rather than succeeding silently.
    let err = fx.orders.delete_order(order.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn orders_listed_per_user_and_restaurant() {
    let fx = fixture();
    let (customer, address, restaurant, pizza, _) = seed_order_world(&fx).await;

    for _ in 0..2 {
        fx.orders
            .create_order(
                customer,
                OrderRequest {
                    restaurant_id: restaurant.id,
                    delivery_address_id: address,
                    payment_method: PaymentMethod::CreditCard,
                    items: vec![OrderItemRequest {
                        menu_item_id: pizza.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .unwrap();
    }

    let mine = fx.orders.orders_for_user(customer).await.unwrap();
    assert_eq!(mine.len(), 2);

    let theirs = fx
        .orders
        .orders_for_restaurant(restaurant.id)
        .await
        .unwrap();
    assert_eq!(theirs.len(), 2);

    let nobody = fx.orders.orders_for_user(UserId::new(999)).await.unwrap();
    assert!(nobody.is_empty());
}
