//! Backend Conformance Tests
//!
//! Exercises the declared contract through the reference backend:
//! - Ids are generated, unique and immutable
//! - Records missing required fields are never stored
//! - Queries by `user_id` return exactly the matching records
//! - Deletes do not cascade across models

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use concierge_data::auth::AuthContext;
use concierge_data::backend::{BackendError, DataClient, ListOptions, MemoryBackend};
use concierge_data::records::{
    Booking, CreateBooking, CreateUserProfile, CreateWishlist, UserProfile, Wishlist,
};
use concierge_data::schema::{concierge_schema, SchemaRegistry, BOOKINGS, USER_ID, USER_PROFILE, WISHLIST};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn backend() -> MemoryBackend {
    MemoryBackend::new(SchemaRegistry::from_schema(concierge_schema()).unwrap())
}

fn caller() -> AuthContext {
    AuthContext::authenticated("sub-1")
}

fn ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Scenario
// =============================================================================

/// A Wishlist item for u1 comes back from a u1 query, and nothing else does.
#[test]
fn test_wishlist_query_by_user() {
    let backend = backend();
    let ctx = caller();

    let created = backend
        .create(
            WISHLIST,
            json!({"user_id": "u1", "asin": "B001", "title": "Widget", "price": "9.99"}),
            &ctx,
        )
        .unwrap();
    backend
        .create(
            WISHLIST,
            json!({"user_id": "u2", "asin": "B002", "title": "Gadget", "price": "5.00"}),
            &ctx,
        )
        .unwrap();

    let page = backend
        .query_index(WISHLIST, USER_ID, "u1", &ListOptions::new(), &ctx)
        .unwrap();

    assert_eq!(page.items, vec![created.clone()]);
    assert!(page.next_token.is_none());
    assert_eq!(created["asin"], "B001");
    assert_eq!(created["title"], "Widget");
    assert_eq!(created["price"], "9.99");
}

// =============================================================================
// Identity Tests
// =============================================================================

#[test]
fn test_generated_ids_are_unique() {
    let backend = backend();
    let ctx = caller();
    let mut seen = HashSet::new();

    for model in [USER_PROFILE, WISHLIST, BOOKINGS] {
        for i in 0..50 {
            let input = match model {
                USER_PROFILE => json!({"user_id": format!("u{}", i)}),
                WISHLIST => json!({"user_id": "u1", "asin": "B001", "title": "t", "price": "1"}),
                _ => json!({
                    "user_id": "u1", "order_id": format!("o{}", i), "item_type": "product",
                    "title": "t", "price": "1"
                }),
            };
            let record = backend.create(model, input, &ctx).unwrap();
            assert!(seen.insert(record["id"].as_str().unwrap().to_string()));
        }
    }
}

#[test]
fn test_concurrent_creates_get_distinct_ids() {
    let backend = Arc::new(backend());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        backend
                            .create(
                                WISHLIST,
                                json!({"user_id": format!("u{}", t), "asin": format!("B{}", i), "title": "t", "price": "1"}),
                                &caller(),
                            )
                            .unwrap()["id"]
                            .as_str()
                            .unwrap()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id));
        }
    }
    assert_eq!(all.len(), 100);

    let page = backend
        .list(WISHLIST, &ListOptions::new().limit(1000), &caller())
        .unwrap();
    assert_eq!(page.items.len(), 100);
}

#[test]
fn test_client_supplied_id_rejected() {
    let backend = backend();
    let result = backend.create(
        WISHLIST,
        json!({"id": "chosen", "user_id": "u1", "asin": "B001", "title": "t", "price": "1"}),
        &caller(),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, BackendError::IdSystemGenerated));
    assert_eq!(err.code(), "DATA_ID_SYSTEM_GENERATED");
}

#[test]
fn test_id_is_immutable() {
    let backend = backend();
    let record = backend
        .create(USER_PROFILE, json!({"user_id": "u1"}), &caller())
        .unwrap();
    let id = record["id"].as_str().unwrap();

    let result = backend.update(USER_PROFILE, id, json!({"id": "other"}), &caller());
    assert!(matches!(result, Err(BackendError::Schema(_))));
    assert_eq!(backend.get(USER_PROFILE, id, &caller()).unwrap()["id"], id);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_missing_required_field_not_stored() {
    let backend = backend();
    let ctx = caller();

    let cases = [
        (USER_PROFILE, json!({"email": "a@example.com"})),
        (WISHLIST, json!({"user_id": "u1", "title": "Widget", "price": "9.99"})),
        (BOOKINGS, json!({"user_id": "u1", "order_id": "o1", "title": "t", "price": "1"})),
    ];

    for (model, input) in cases {
        let err = backend.create(model, input, &ctx).unwrap_err();
        assert_eq!(err.code(), "DATA_SCHEMA_VALIDATION_FAILED", "model {}", model);
        assert!(backend.list(model, &ListOptions::new(), &ctx).unwrap().items.is_empty());
    }
}

#[test]
fn test_undeclared_field_rejected() {
    let backend = backend();
    let result = backend.create(
        WISHLIST,
        json!({"user_id": "u1", "asin": "B001", "title": "t", "price": "1", "quantity": "2"}),
        &caller(),
    );
    assert!(result.is_err());
}

#[test]
fn test_update_cannot_clear_required_field() {
    let backend = backend();
    let record = backend
        .create(
            WISHLIST,
            json!({"user_id": "u1", "asin": "B001", "title": "t", "price": "1"}),
            &caller(),
        )
        .unwrap();
    let id = record["id"].as_str().unwrap();

    assert!(backend
        .update(WISHLIST, id, json!({"asin": null}), &caller())
        .is_err());
    assert_eq!(backend.get(WISHLIST, id, &caller()).unwrap(), record);
}

// =============================================================================
// Index Query Tests
// =============================================================================

#[test]
fn test_user_id_query_exact_for_every_model() {
    let registry = SchemaRegistry::from_schema(concierge_schema()).unwrap();
    let client: DataClient = DataClient::new(Arc::new(MemoryBackend::new(registry)), caller());

    for user in ["u1", "u2", "u3"] {
        client
            .create::<UserProfile>(&CreateUserProfile::new(user))
            .unwrap();
        for i in 0..3 {
            client
                .create::<Wishlist>(&CreateWishlist::new(user, format!("B00{}", i), "Widget", "9.99"))
                .unwrap();
            client
                .create::<Booking>(&CreateBooking::product(user, format!("o{}", i), "Tent", "120.00"))
                .unwrap();
        }
    }

    let profiles = client.list_by_user::<UserProfile>("u2").unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].user_id, "u2");

    let items = client.list_by_user::<Wishlist>("u2").unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|w| w.user_id == "u2"));

    let bookings = client.list_by_user::<Booking>("u2").unwrap();
    assert_eq!(bookings.len(), 3);
    assert!(bookings.iter().all(|b| b.user_id == "u2" && b.is_product()));

    assert!(client.list_by_user::<Wishlist>("nobody").unwrap().is_empty());
}

#[test]
fn test_index_query_pages_cover_all_matches() {
    let backend = backend();
    let ctx = caller();

    let mut expected = Vec::new();
    for i in 0..7 {
        let record = backend
            .create(
                BOOKINGS,
                json!({
                    "user_id": "u1", "order_id": format!("o{}", i), "item_type": "product",
                    "title": "t", "price": "1"
                }),
                &ctx,
            )
            .unwrap();
        expected.push(record["id"].as_str().unwrap().to_string());
    }
    expected.sort();

    let mut collected = Vec::new();
    let mut options = ListOptions::new().limit(3);
    loop {
        let page = backend.query_index(BOOKINGS, USER_ID, "u1", &options, &ctx).unwrap();
        collected.extend(ids(&page.items));
        match page.next_token {
            Some(token) => options = options.after(token),
            None => break,
        }
    }

    assert_eq!(collected, expected);
}

// =============================================================================
// Delete Tests
// =============================================================================

/// Deleting a wishlist item leaves the user's other records alone.
#[test]
fn test_delete_does_not_cascade() {
    let backend = backend();
    let ctx = caller();

    let profile = backend
        .create(USER_PROFILE, json!({"user_id": "u1"}), &ctx)
        .unwrap();
    let item = backend
        .create(
            WISHLIST,
            json!({"user_id": "u1", "asin": "B001", "title": "Widget", "price": "9.99"}),
            &ctx,
        )
        .unwrap();
    let booking = backend
        .create(
            BOOKINGS,
            json!({
                "user_id": "u1", "order_id": "o1", "item_type": "product",
                "title": "Widget", "price": "9.99", "asin": "B001"
            }),
            &ctx,
        )
        .unwrap();

    backend
        .delete(WISHLIST, item["id"].as_str().unwrap(), &ctx)
        .unwrap();

    assert_eq!(backend.get(USER_PROFILE, profile["id"].as_str().unwrap(), &ctx).unwrap(), profile);
    assert_eq!(backend.get(BOOKINGS, booking["id"].as_str().unwrap(), &ctx).unwrap(), booking);
    assert!(backend
        .query_index(WISHLIST, USER_ID, "u1", &ListOptions::new(), &ctx)
        .unwrap()
        .items
        .is_empty());
}

#[test]
fn test_delete_missing_record() {
    let backend = backend();
    let err = backend.delete(BOOKINGS, "missing", &caller()).unwrap_err();
    assert_eq!(err.status_code(), 404);
}
