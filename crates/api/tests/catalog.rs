//! Catalog CRUD tests over the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use quickbite_api::db::InMemoryDb;
use quickbite_api::error::ApiError;
use quickbite_api::models::{NewMenuItem, NewRestaurant};
use quickbite_api::services::CatalogService;
use quickbite_core::{MenuItemId, RestaurantId};

fn fixture() -> CatalogService {
    CatalogService::new(Arc::new(InMemoryDb::new()))
}

fn trattoria() -> NewRestaurant {
    NewRestaurant {
        name: "Trattoria Roma".to_owned(),
        description: Some("Roman classics".to_owned()),
        image: None,
        cuisines: vec!["Italian".to_owned(), "Pasta".to_owned()],
        rating: Some(4.6),
        delivery_time: Some("30-40 min".to_owned()),
        delivery_fee: Decimal::new(349, 2),
        min_order: Some(Decimal::new(1500, 2)),
    }
}

#[tokio::test]
async fn restaurant_crud_roundtrip() {
    let catalog = fixture();

    let created = catalog.create_restaurant(trattoria()).await.unwrap();
    assert_eq!(created.name, "Trattoria Roma");

    let fetched = catalog.get_restaurant(created.id).await.unwrap();
    assert_eq!(fetched.delivery_fee, Decimal::new(349, 2));

    let mut patch = trattoria();
    patch.delivery_fee = Decimal::new(199, 2);
    let updated = catalog.update_restaurant(created.id, patch).await.unwrap();
    assert_eq!(updated.delivery_fee, Decimal::new(199, 2));

    catalog.delete_restaurant(created.id).await.unwrap();
    let err = catalog.get_restaurant(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn search_and_cuisine_filters() {
    let catalog = fixture();
    catalog.create_restaurant(trattoria()).await.unwrap();

    let mut sushi = trattoria();
    sushi.name = "Sakura Sushi".to_owned();
    sushi.cuisines = vec!["Japanese".to_owned()];
    catalog.create_restaurant(sushi).await.unwrap();

    let italian = catalog.restaurants_by_cuisine("Italian").await.unwrap();
    assert_eq!(italian.len(), 1);
    assert_eq!(italian[0].name, "Trattoria Roma");

    // Search is case-insensitive and matches cuisines too.
    let hits = catalog.search_restaurants("sush").await.unwrap();
    assert_eq!(hits.len(), 1);
    let hits = catalog.search_restaurants("japan").await.unwrap();
    assert_eq!(hits.len(), 1);
    let hits = catalog.search_restaurants("kebab").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn menu_items_require_an_existing_restaurant() {
    let catalog = fixture();

    let err = catalog
        .create_menu_item(NewMenuItem {
            restaurant_id: RestaurantId::new(42),
            name: "Orphan Dish".to_owned(),
            description: None,
            price: Decimal::new(900, 2),
            image: None,
            category: "Mains".to_owned(),
            available: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn menu_filtering_by_category() {
    let catalog = fixture();
    let restaurant = catalog.create_restaurant(trattoria()).await.unwrap();

    for (name, category) in [
        ("Cacio e Pepe", "Pasta"),
        ("Carbonara", "Pasta"),
        ("Panna Cotta", "Dessert"),
    ] {
        catalog
            .create_menu_item(NewMenuItem {
                restaurant_id: restaurant.id,
                name: name.to_owned(),
                description: None,
                price: Decimal::new(1200, 2),
                image: None,
                category: category.to_owned(),
                available: true,
            })
            .await
            .unwrap();
    }

    let all = catalog
        .menu_for_restaurant(restaurant.id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let pasta = catalog
        .menu_for_restaurant(restaurant.id, Some("Pasta"))
        .await
        .unwrap();
    assert_eq!(pasta.len(), 2);

    let err = catalog.get_menu_item(MenuItemId::new(777)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn validation_rejects_nonsense() {
    let catalog = fixture();

    let mut nameless = trattoria();
    nameless.name = String::new();
    let err = catalog.create_restaurant(nameless).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let mut negative = trattoria();
    negative.delivery_fee = Decimal::new(-100, 2);
    let err = catalog.create_restaurant(negative).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}
