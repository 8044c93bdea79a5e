//! Integration tests for the cart store lifecycle.
//!
//! These tests mount stores over real files to verify that the cart survives
//! a restart and that the persisted blob tracks the in-memory list.

use gomarketplace_cart::config::DEFAULT_STORAGE_KEY;
use gomarketplace_cart::{FileStorage, HydrationStatus, Storage};
use gomarketplace_core::{CartLineItem, NewCartLineItem, Price, ProductId};
use gomarketplace_integration_tests::mount_file_cart;

async fn stored_items(dir: &std::path::Path) -> Option<Vec<CartLineItem>> {
    FileStorage::new(dir)
        .get(DEFAULT_STORAGE_KEY)
        .await
        .unwrap()
        .map(|blob| serde_json::from_str(&blob).unwrap())
}

// =============================================================================
// Hydration
// =============================================================================

#[tokio::test]
async fn test_fresh_directory_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();

    let store = mount_file_cart(dir.path()).await;

    assert_eq!(store.hydration_status(), HydrationStatus::Empty);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_existing_snapshot_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    FileStorage::new(dir.path())
        .set(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"a","title":"Lamp","image_url":"https://img/lamp.png","price":49.9,"quantity":2}]"#
                .to_string(),
        )
        .await
        .unwrap();

    let store = mount_file_cart(dir.path()).await;

    assert_eq!(store.items(), vec![CartLineItem {
        id: ProductId::new("a"),
        title: "Lamp".to_string(),
        image_url: "https://img/lamp.png".to_string(),
        price: Price::from_cents(4990),
        quantity: 2,
    }]);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = mount_file_cart(dir.path()).await;
    first.add_to_cart(NewCartLineItem::new("x", "T", "u", 10));
    first.add_to_cart(NewCartLineItem::new("y", "U", "v", 3));
    first.increment(&"x".into());
    first.flush().await;
    let before = first.items();
    drop(first);

    let second = mount_file_cart(dir.path()).await;

    assert_eq!(second.hydration_status(), HydrationStatus::Restored { items: 2 });
    assert_eq!(second.items(), before);
}

#[tokio::test]
async fn test_persisted_blob_matches_memory_after_flush() {
    let dir = tempfile::tempdir().unwrap();
    let store = mount_file_cart(dir.path()).await;
    let id = ProductId::new("x");

    store.add_to_cart(NewCartLineItem::new("x", "T", "u", 10));
    for _ in 0..5 {
        store.increment(&id);
    }
    for _ in 0..8 {
        store.decrement(&id);
    }
    store.flush().await;

    assert_eq!(store.get(&id).unwrap().quantity, -2);
    assert_eq!(stored_items(dir.path()).await, Some(store.items()));
}

#[tokio::test]
async fn test_concurrent_handles_converge() {
    let dir = tempfile::tempdir().unwrap();
    let store = mount_file_cart(dir.path()).await;

    let mut tasks = Vec::new();
    for i in 0..10 {
        let handle = store.clone();
        tasks.push(tokio::spawn(async move {
            handle.add_to_cart(NewCartLineItem::new(format!("p{i}"), "T", "u", 1));
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    store.flush().await;

    assert_eq!(store.items().len(), 10);
    assert_eq!(stored_items(dir.path()).await, Some(store.items()));
}
