use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DocumentKey, DocumentKind, Result};

/// One serialized document record inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// The store key of the record.
    pub key: DocumentKey,

    /// The serialized document state.
    pub state: serde_json::Value,
}

/// A point-in-time export of the full store contents.
///
/// Snapshots round-trip losslessly: importing one restores every record and
/// the per-kind number sequences, so document numbering continues where the
/// exporting store left off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,

    /// Per-kind document number sequences at the time of the snapshot.
    pub sequences: HashMap<DocumentKind, u64>,

    /// All records, sorted by kind and number for stable output.
    pub records: Vec<SnapshotRecord>,
}

impl StoreSnapshot {
    /// Builds a snapshot from store internals.
    pub fn from_parts(
        sequences: HashMap<DocumentKind, u64>,
        records: &HashMap<DocumentKey, serde_json::Value>,
    ) -> Self {
        let mut records: Vec<_> = records
            .iter()
            .map(|(key, state)| SnapshotRecord {
                key: key.clone(),
                state: state.clone(),
            })
            .collect();
        records.sort_by(|a, b| {
            a.key
                .kind
                .as_str()
                .cmp(b.key.kind.as_str())
                .then(a.key.number.cmp(&b.key.number))
        });

        Self {
            taken_at: Utc::now(),
            sequences,
            records,
        }
    }

    /// Returns the number of records in the snapshot.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Writes the snapshot to a file.
    ///
    /// The snapshot is written to a sibling temp file first and renamed into
    /// place, so a reader never observes a half-written snapshot.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Reads a snapshot back from a file.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
