//! Integration tests for snapshot persistence across store instances.

use common::{DocumentKey, DocumentKind};
use state_store::{InMemoryStateStore, SnapshotConfig, StateStore, StoreSnapshot, spawn_flush_task};

async fn populated_store() -> InMemoryStateStore {
    let store = InMemoryStateStore::new();

    for i in 1..=3u64 {
        let number = store.next_number(DocumentKind::Requisition).await.unwrap();
        store
            .set(
                DocumentKey::requisition(number.clone()),
                serde_json::json!({"number": number.as_str(), "seq": i}),
            )
            .await
            .unwrap();
    }

    let number = store.next_number(DocumentKind::Order).await.unwrap();
    store
        .set(
            DocumentKey::order(number.clone()),
            serde_json::json!({"number": number.as_str()}),
        )
        .await
        .unwrap();

    store
}

#[tokio::test]
async fn save_load_cycle_preserves_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = populated_store().await;
    let before = store.export_snapshot().await;
    before.write(&path).await.unwrap();

    let restored = InMemoryStateStore::new();
    restored
        .import_snapshot(StoreSnapshot::read(&path).await.unwrap())
        .await;

    assert_eq!(restored.record_count().await, 4);
    for (key, state) in store.list(DocumentKind::Requisition).await.unwrap() {
        assert_eq!(restored.get(&key).await.unwrap(), Some(state));
    }
    for (key, state) in store.list(DocumentKind::Order).await.unwrap() {
        assert_eq!(restored.get(&key).await.unwrap(), Some(state));
    }
}

#[tokio::test]
async fn restored_store_continues_numbering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = populated_store().await;
    store.export_snapshot().await.write(&path).await.unwrap();

    let restored = InMemoryStateStore::new();
    restored
        .import_snapshot(StoreSnapshot::read(&path).await.unwrap())
        .await;

    let next_requisition = restored
        .next_number(DocumentKind::Requisition)
        .await
        .unwrap();
    let next_order = restored.next_number(DocumentKind::Order).await.unwrap();

    assert_eq!(next_requisition.as_str(), "PR-000004");
    assert_eq!(next_order.as_str(), "PO-000002");
}

#[tokio::test]
async fn periodic_flush_produces_a_loadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flushed.json");

    let store = populated_store().await;
    let handle = spawn_flush_task(
        store.clone(),
        SnapshotConfig {
            path: path.clone(),
            interval: std::time::Duration::from_millis(20),
        },
    );

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    handle.abort();

    let snapshot = StoreSnapshot::read(&path).await.unwrap();
    assert_eq!(snapshot.record_count(), 4);

    let restored = InMemoryStateStore::new();
    restored.import_snapshot(snapshot).await;
    assert_eq!(restored.record_count().await, store.record_count().await);
}
