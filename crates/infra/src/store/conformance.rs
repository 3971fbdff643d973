//! Behaviour every `InventoryStore` backend must share.
//!
//! Each backend's test module calls these with a fresh store.

use std::sync::Arc;

use stockbook_catalog::ProductName;
use stockbook_ledger::{Direction, MovementDraft, NewMovement};

use super::r#trait::{InventoryStore, StoreError};

pub(crate) fn name(raw: &str) -> ProductName {
    ProductName::parse(raw).unwrap()
}

pub(crate) fn movement(
    product: &str,
    direction: Direction,
    timestamp: Option<&str>,
    pouches: i64,
    grams: f64,
) -> NewMovement {
    let mut draft = MovementDraft::new(product, pouches, grams);
    draft.timestamp = timestamp.map(str::to_string);
    draft.validate(direction).unwrap().unwrap()
}

pub(crate) async fn duplicate_products_are_rejected<S: InventoryStore>(store: S) {
    let first = store.insert_product(&name("Amla")).await.unwrap();
    assert_eq!(first.name.as_str(), "Amla");

    let err = store.insert_product(&name("Amla")).await.unwrap_err();
    assert_eq!(err, StoreError::DuplicateProduct("Amla".to_string()));

    // Case-sensitive: a different spelling is a different product.
    let other = store.insert_product(&name("amla")).await.unwrap();
    assert_ne!(other.id, first.id);

    assert!(store.product_exists(&name("Amla")).await.unwrap());
    assert!(!store.product_exists(&name("AMLA")).await.unwrap());
}

pub(crate) async fn products_list_in_byte_order<S: InventoryStore>(store: S) {
    for raw in ["Bael", "amla", "Apple – Red", "Amla", "Apple – Green"] {
        store.insert_product(&name(raw)).await.unwrap();
    }

    let names: Vec<String> = store
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name.into_inner())
        .collect();

    assert_eq!(
        names,
        vec!["Amla", "Apple – Green", "Apple – Red", "Bael", "amla"]
    );
}

pub(crate) async fn unknown_product_movements_are_rejected<S: InventoryStore>(store: S) {
    let err = store
        .append_movement(movement("Ghost", Direction::Inward, None, 1, 10.0))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownProduct("Ghost".to_string()));

    let snapshot = store.snapshot().await.unwrap();
    assert!(snapshot.movements.is_empty());
}

pub(crate) async fn record_ids_increase_across_directions<S: InventoryStore>(store: S) {
    store.insert_product(&name("Amla")).await.unwrap();

    let a = store
        .append_movement(movement("Amla", Direction::Inward, None, 1, 1.0))
        .await
        .unwrap();
    let b = store
        .append_movement(movement("Amla", Direction::Outward, None, 1, 1.0))
        .await
        .unwrap();
    let c = store
        .append_movement(movement("Amla", Direction::Inward, None, 1, 1.0))
        .await
        .unwrap();

    assert!(a.id < b.id);
    assert!(b.id < c.id);

    // Ids keep increasing after a rejected append.
    let _ = store
        .append_movement(movement("Ghost", Direction::Inward, None, 1, 1.0))
        .await;
    let d = store
        .append_movement(movement("Amla", Direction::Outward, None, 1, 1.0))
        .await
        .unwrap();
    assert!(c.id < d.id);
}

pub(crate) async fn movements_list_newest_first<S: InventoryStore>(store: S) {
    store.insert_product(&name("Amla")).await.unwrap();

    let same_1 = store
        .append_movement(movement("Amla", Direction::Inward, Some("2025-06-05 14:30:00"), 1, 1.0))
        .await
        .unwrap();
    let older = store
        .append_movement(movement("Amla", Direction::Inward, Some("2025-05-30 11:30:00"), 1, 1.0))
        .await
        .unwrap();
    let undated = store
        .append_movement(movement("Amla", Direction::Inward, None, 1, 1.0))
        .await
        .unwrap();
    let same_2 = store
        .append_movement(movement("Amla", Direction::Inward, Some("2025-06-05 14:30:00"), 1, 1.0))
        .await
        .unwrap();
    let outward = store
        .append_movement(movement("Amla", Direction::Outward, Some("2030-01-01"), 1, 1.0))
        .await
        .unwrap();

    let inward: Vec<_> = store
        .list_movements(Direction::Inward)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(inward, vec![same_2.id, same_1.id, older.id, undated.id]);

    let outward_ids: Vec<_> = store
        .list_movements(Direction::Outward)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(outward_ids, vec![outward.id]);
}

pub(crate) async fn snapshot_sees_catalog_and_ledger<S: InventoryStore>(store: S) {
    store.insert_product(&name("Bael")).await.unwrap();
    store.insert_product(&name("Amla")).await.unwrap();

    let mut full = MovementDraft::new("Amla", 10, 1000.5);
    full.sequence_no = Some(6);
    full.timestamp = Some("2025-05-30 11:30:00".to_string());
    full.pouch_batch_date = Some("2025-03-04".to_string());
    full.remarks = Some("Restocked".to_string());
    let stored = store
        .append_movement(full.validate(Direction::Inward).unwrap().unwrap())
        .await
        .unwrap();
    store
        .append_movement(movement("Bael", Direction::Outward, None, 2, 20.0))
        .await
        .unwrap();

    let snapshot = store.snapshot().await.unwrap();
    let names: Vec<_> = snapshot.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Amla", "Bael"]);
    assert_eq!(snapshot.movements.len(), 2);
    assert_eq!(snapshot.movements[0], stored);
    assert_eq!(snapshot.movements[0].sequence_no, Some(6));
    assert_eq!(snapshot.movements[0].pouch_batch_date.as_deref(), Some("2025-03-04"));
    assert_eq!(snapshot.movements[0].remarks.as_deref(), Some("Restocked"));
    assert_eq!(snapshot.movements[0].weight_grams, 1000.5);
    assert_eq!(snapshot.movements[1].direction, Direction::Outward);
}

pub(crate) async fn concurrent_registration_admits_one_winner<S>(store: Arc<S>)
where
    S: InventoryStore + 'static,
{
    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.insert_product(&name("Amla")).await
        }));
    }

    let mut ok = 0;
    let mut duplicate = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(StoreError::DuplicateProduct(_)) => duplicate += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(duplicate, 15);
    assert_eq!(store.list_products().await.unwrap().len(), 1);
}

pub(crate) async fn concurrent_appends_get_distinct_ids<S>(store: Arc<S>)
where
    S: InventoryStore + 'static,
{
    store.insert_product(&name("Amla")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        let direction = if i % 2 == 0 { Direction::Inward } else { Direction::Outward };
        handles.push(tokio::spawn(async move {
            store
                .append_movement(movement("Amla", direction, None, 1, 1.0))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 32);
}
