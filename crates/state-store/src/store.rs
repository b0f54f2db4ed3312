use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{DocumentKey, DocumentKind, DocumentNumber, Result};

/// Core trait for document state stores.
///
/// A state store holds the authoritative current state of every document,
/// keyed by kind and number. Individual operations are atomic: a concurrent
/// reader never observes a torn record. Operations on *different* keys carry
/// no ordering guarantee relative to each other.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Issues the next document number for a kind.
    ///
    /// Numbers are unique and monotonically increasing per kind for the
    /// lifetime of the store (including across a snapshot import).
    async fn next_number(&self, kind: DocumentKind) -> Result<DocumentNumber>;

    /// Retrieves the current state of a document.
    ///
    /// Returns `None` if no record exists under the key.
    async fn get(&self, key: &DocumentKey) -> Result<Option<serde_json::Value>>;

    /// Writes the current state of a document, replacing any previous record.
    async fn set(&self, key: DocumentKey, state: serde_json::Value) -> Result<()>;

    /// Deletes a record.
    ///
    /// Returns true if a record existed under the key. Workflow documents are
    /// never deleted (cancellation is a status, not removal); this exists for
    /// store administration and tests.
    async fn delete(&self, key: &DocumentKey) -> Result<bool>;

    /// Lists all records of a kind, sorted by document number.
    ///
    /// This is the read-only enumeration surface consumed by monitoring.
    async fn list(&self, kind: DocumentKind) -> Result<Vec<(DocumentKey, serde_json::Value)>>;
}

/// Extension trait providing typed convenience methods for state stores.
#[async_trait]
pub trait StateStoreExt: StateStore {
    /// Retrieves a document and deserializes it.
    async fn get_typed<T: DeserializeOwned>(&self, key: &DocumentKey) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(state) => Ok(Some(serde_json::from_value(state)?)),
            None => Ok(None),
        }
    }

    /// Serializes a document and writes it.
    async fn set_typed<T: Serialize + Sync>(&self, key: DocumentKey, document: &T) -> Result<()> {
        let state = serde_json::to_value(document)?;
        self.set(key, state).await
    }

    /// Lists all records of a kind, deserialized.
    async fn list_typed<T: DeserializeOwned>(&self, kind: DocumentKind) -> Result<Vec<T>> {
        let records = self.list(kind).await?;
        records
            .into_iter()
            .map(|(_, state)| serde_json::from_value(state).map_err(Into::into))
            .collect()
    }

    /// Checks whether a record exists under the key.
    async fn contains(&self, key: &DocumentKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

// Blanket implementation for all StateStore implementations
impl<T: StateStore + ?Sized> StateStoreExt for T {}
