use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    DocumentKey, DocumentKind, DocumentNumber, Result, StoreSnapshot,
    store::StateStore,
};

#[derive(Debug, Default)]
struct StoreState {
    records: HashMap<DocumentKey, serde_json::Value>,
    sequences: HashMap<DocumentKind, u64>,
}

/// In-memory state store implementation.
///
/// The record map and the number sequences live behind a single lock, so each
/// operation is serialized against all others and a record is always observed
/// whole. Cloning the store clones the handle, not the contents.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    inner: Arc<RwLock<StoreState>>,
}

impl InMemoryStateStore {
    /// Creates a new empty in-memory state store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of records stored.
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Clears all records and resets the number sequences.
    pub async fn clear(&self) {
        let mut state = self.inner.write().await;
        state.records.clear();
        state.sequences.clear();
    }

    /// Exports the full store contents as a snapshot.
    pub async fn export_snapshot(&self) -> StoreSnapshot {
        let state = self.inner.read().await;
        StoreSnapshot::from_parts(state.sequences.clone(), &state.records)
    }

    /// Replaces the store contents with a previously exported snapshot.
    ///
    /// Sequences are restored as well, so numbering continues where the
    /// snapshot left off.
    pub async fn import_snapshot(&self, snapshot: StoreSnapshot) {
        let mut state = self.inner.write().await;
        state.sequences = snapshot.sequences;
        state.records = snapshot
            .records
            .into_iter()
            .map(|record| (record.key, record.state))
            .collect();
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn next_number(&self, kind: DocumentKind) -> Result<DocumentNumber> {
        let mut state = self.inner.write().await;
        let sequence = state.sequences.entry(kind).or_insert(0);
        *sequence += 1;
        Ok(DocumentNumber::from_sequence(kind, *sequence))
    }

    async fn get(&self, key: &DocumentKey) -> Result<Option<serde_json::Value>> {
        let state = self.inner.read().await;
        Ok(state.records.get(key).cloned())
    }

    async fn set(&self, key: DocumentKey, value: serde_json::Value) -> Result<()> {
        let mut state = self.inner.write().await;
        state.records.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &DocumentKey) -> Result<bool> {
        let mut state = self.inner.write().await;
        Ok(state.records.remove(key).is_some())
    }

    async fn list(&self, kind: DocumentKind) -> Result<Vec<(DocumentKey, serde_json::Value)>> {
        let state = self.inner.read().await;
        let mut records: Vec<_> = state
            .records
            .iter()
            .filter(|(key, _)| key.kind == kind)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        records.sort_by(|(a, _), (b, _)| a.number.cmp(&b.number));
        Ok(records)
    }
}
