//! Address invariant and profile tests over the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use quickbite_api::db::InMemoryDb;
use quickbite_api::error::ApiError;
use quickbite_api::models::{NewAddress, ProfileUpdate};
use quickbite_api::services::AccountService;
use quickbite_core::{AddressId, Role, UserId};

fn fixture() -> (Arc<InMemoryDb>, AccountService) {
    let db = Arc::new(InMemoryDb::new());
    let accounts = AccountService::new(db.clone(), db.clone());
    (db, accounts)
}

fn address(street: &str, is_default: bool) -> NewAddress {
    NewAddress {
        street: street.to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zip_code: "62704".to_owned(),
        instructions: None,
        is_default,
    }
}

async fn default_count(accounts: &AccountService, user: UserId) -> usize {
    accounts
        .addresses(user)
        .await
        .unwrap()
        .iter()
        .filter(|a| a.is_default)
        .count()
}

#[tokio::test]
async fn adding_a_second_default_swaps_the_flag() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let first = accounts
        .add_address(user.id, address("1 First Ave", true))
        .await
        .unwrap();
    assert!(first.is_default);

    let second = accounts
        .add_address(user.id, address("2 Second St", true))
        .await
        .unwrap();
    assert!(second.is_default);

    let all = accounts.addresses(user.id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(default_count(&accounts, user.id).await, 1);

    let first = accounts.address(user.id, first.id).await.unwrap();
    assert!(!first.is_default);
}

#[tokio::test]
async fn promoting_via_update_swaps_the_flag() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let first = accounts
        .add_address(user.id, address("1 First Ave", true))
        .await
        .unwrap();
    let second = accounts
        .add_address(user.id, address("2 Second St", false))
        .await
        .unwrap();

    let promoted = accounts
        .update_address(user.id, second.id, address("2 Second St", true))
        .await
        .unwrap();
    assert!(promoted.is_default);

    assert_eq!(default_count(&accounts, user.id).await, 1);
    let first = accounts.address(user.id, first.id).await.unwrap();
    assert!(!first.is_default);
}

#[tokio::test]
async fn re_promoting_the_default_keeps_it() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let only = accounts
        .add_address(user.id, address("1 First Ave", true))
        .await
        .unwrap();

    // Updating the current default with is_default still true must not
    // clear its own flag through the swap path.
    let updated = accounts
        .update_address(user.id, only.id, address("1 First Avenue", true))
        .await
        .unwrap();
    assert!(updated.is_default);
    assert_eq!(updated.street, "1 First Avenue");
    assert_eq!(default_count(&accounts, user.id).await, 1);
}

#[tokio::test]
async fn clearing_the_flag_promotes_nothing() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let first = accounts
        .add_address(user.id, address("1 First Ave", true))
        .await
        .unwrap();
    accounts
        .add_address(user.id, address("2 Second St", false))
        .await
        .unwrap();

    accounts
        .update_address(user.id, first.id, address("1 First Ave", false))
        .await
        .unwrap();

    assert_eq!(default_count(&accounts, user.id).await, 0);
}

#[tokio::test]
async fn non_default_addresses_do_not_disturb_the_default() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let main = accounts
        .add_address(user.id, address("1 First Ave", true))
        .await
        .unwrap();
    accounts
        .add_address(user.id, address("2 Second St", false))
        .await
        .unwrap();
    accounts
        .add_address(user.id, address("3 Third Rd", false))
        .await
        .unwrap();

    assert_eq!(default_count(&accounts, user.id).await, 1);
    let main = accounts.address(user.id, main.id).await.unwrap();
    assert!(main.is_default);
}

#[tokio::test]
async fn defaults_are_scoped_per_user() {
    let (db, accounts) = fixture();
    let ada = db.seed_user("Ada", "ada@example.com", &[Role::User]);
    let eve = db.seed_user("Eve", "eve@example.com", &[Role::User]);

    accounts
        .add_address(ada.id, address("1 Ada Ave", true))
        .await
        .unwrap();
    accounts
        .add_address(eve.id, address("9 Eve Blvd", true))
        .await
        .unwrap();

    // One default each, untouched by the other user's writes.
    assert_eq!(default_count(&accounts, ada.id).await, 1);
    assert_eq!(default_count(&accounts, eve.id).await, 1);
}

#[tokio::test]
async fn foreign_addresses_read_as_not_found() {
    let (db, accounts) = fixture();
    let ada = db.seed_user("Ada", "ada@example.com", &[Role::User]);
    let eve = db.seed_user("Eve", "eve@example.com", &[Role::User]);

    let hers = accounts
        .add_address(eve.id, address("9 Eve Blvd", false))
        .await
        .unwrap();

    let err = accounts.address(ada.id, hers.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = accounts
        .update_address(ada.id, hers.id, address("9 Eve Blvd", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = accounts.delete_address(ada.id, hers.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Same answer for an id that was never issued.
    let err = accounts
        .address(ada.id, AddressId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn address_validation_rejects_blank_fields() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let err = accounts
        .add_address(user.id, address("   ", false))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn deleting_an_address_removes_it() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let addr = accounts
        .add_address(user.id, address("1 First Ave", false))
        .await
        .unwrap();
    accounts.delete_address(user.id, addr.id).await.unwrap();

    assert!(accounts.addresses(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_update_changes_name_and_phone() {
    let (db, accounts) = fixture();
    let user = db.seed_user("Ada", "ada@example.com", &[Role::User]);

    let updated = accounts
        .update_profile(
            user.id,
            ProfileUpdate {
                name: "Ada Lovelace".to_owned(),
                phone: Some("+1-555-0100".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.phone.as_deref(), Some("+1-555-0100"));
    assert_eq!(updated.email, "ada@example.com");

    let blank = accounts
        .update_profile(
            user.id,
            ProfileUpdate {
                name: "  ".to_owned(),
                phone: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(blank, ApiError::Validation(_)));
}
