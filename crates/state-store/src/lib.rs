//! Process-wide document state store.
//!
//! The store is the single owner of the authoritative copy of every workflow
//! document. It maps a [`DocumentKey`] (kind + number) to the serialized
//! current state of that document and issues monotonic document numbers per
//! kind. All access goes through the [`StateStore`] trait so higher layers
//! receive the store as an explicit dependency rather than reaching for a
//! global.
//!
//! Durability is limited to an optional snapshot: the whole store can be
//! exported to a [`StoreSnapshot`], written to a file, and imported again
//! losslessly. A best-effort periodic flush task is available via
//! [`spawn_flush_task`]; no store operation ever depends on it.

pub mod error;
pub mod flush;
pub mod memory;
pub mod snapshot;
pub mod store;

pub use common::{DocumentKey, DocumentKind, DocumentNumber};
pub use error::{Result, StateStoreError};
pub use flush::{SnapshotConfig, spawn_flush_task};
pub use memory::InMemoryStateStore;
pub use snapshot::{SnapshotRecord, StoreSnapshot};
pub use store::{StateStore, StateStoreExt};
