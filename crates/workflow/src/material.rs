//! Material directory boundary.
//!
//! The material master lives outside this core; the engine only needs to
//! resolve a material reference to its current status when items are created
//! or replaced. Existing references are never revalidated retroactively.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::MaterialId;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Lifecycle status of a material master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStatus {
    /// Material may be referenced by new items.
    Active,

    /// Temporarily blocked for procurement.
    Inactive,

    /// Phased out; kept only for existing references.
    Deprecated,
}

impl MaterialStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialStatus::Active => "active",
            MaterialStatus::Inactive => "inactive",
            MaterialStatus::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base attributes of a material as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInfo {
    /// The material identifier.
    pub id: MaterialId,

    /// Short description from the material master.
    pub description: String,

    /// Current lifecycle status.
    pub status: MaterialStatus,
}

impl MaterialInfo {
    /// Creates a material record.
    pub fn new(
        id: impl Into<MaterialId>,
        description: impl Into<String>,
        status: MaterialStatus,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            status,
        }
    }
}

/// Trait for material directory lookups.
#[async_trait]
pub trait MaterialDirectory: Send + Sync {
    /// Resolves a material ID to its current record.
    ///
    /// Returns `None` for unknown materials.
    async fn lookup(&self, id: &MaterialId) -> Result<Option<MaterialInfo>, WorkflowError>;
}

/// Resolves a material reference and requires it to be active.
///
/// `position` is the 1-based item position carried into the error.
pub(crate) async fn ensure_active<M: MaterialDirectory>(
    directory: &M,
    position: usize,
    id: &MaterialId,
) -> Result<(), WorkflowError> {
    match directory.lookup(id).await? {
        None => Err(WorkflowError::UnknownMaterial {
            item: position,
            material: id.clone(),
        }),
        Some(info) if info.status != MaterialStatus::Active => {
            Err(WorkflowError::MaterialNotActive {
                item: position,
                material: id.clone(),
                status: info.status,
            })
        }
        Some(_) => Ok(()),
    }
}

/// In-memory material directory for tests and the simulation harness.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaterialDirectory {
    state: Arc<RwLock<HashMap<MaterialId, MaterialInfo>>>,
}

impl InMemoryMaterialDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a material record.
    pub fn insert(&self, info: MaterialInfo) {
        self.state.write().unwrap().insert(info.id.clone(), info);
    }

    /// Adds an active material.
    pub fn insert_active(&self, id: impl Into<MaterialId>, description: impl Into<String>) {
        self.insert(MaterialInfo::new(id, description, MaterialStatus::Active));
    }

    /// Changes the status of an existing material. No-op for unknown IDs.
    pub fn set_status(&self, id: &MaterialId, status: MaterialStatus) {
        if let Some(info) = self.state.write().unwrap().get_mut(id) {
            info.status = status;
        }
    }

    /// Returns the number of materials in the directory.
    pub fn material_count(&self) -> usize {
        self.state.read().unwrap().len()
    }
}

#[async_trait]
impl MaterialDirectory for InMemoryMaterialDirectory {
    async fn lookup(&self, id: &MaterialId) -> Result<Option<MaterialInfo>, WorkflowError> {
        Ok(self.state.read().unwrap().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_known_and_unknown_materials() {
        let directory = InMemoryMaterialDirectory::new();
        directory.insert_active("MAT-001", "Steel bolt M8");

        let found = directory.lookup(&"MAT-001".into()).await.unwrap();
        assert_eq!(found.unwrap().status, MaterialStatus::Active);

        let missing = directory.lookup(&"MAT-404".into()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn ensure_active_accepts_active_material() {
        let directory = InMemoryMaterialDirectory::new();
        directory.insert_active("MAT-001", "Steel bolt M8");

        assert!(ensure_active(&directory, 1, &"MAT-001".into()).await.is_ok());
    }

    #[tokio::test]
    async fn ensure_active_rejects_unknown_material() {
        let directory = InMemoryMaterialDirectory::new();
        let err = ensure_active(&directory, 2, &"MAT-404".into())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownMaterial { item: 2, .. }));
    }

    #[tokio::test]
    async fn ensure_active_rejects_inactive_and_deprecated() {
        let directory = InMemoryMaterialDirectory::new();
        directory.insert(MaterialInfo::new(
            "MAT-OLD",
            "Legacy part",
            MaterialStatus::Deprecated,
        ));
        directory.insert_active("MAT-NEW", "Replacement part");
        directory.set_status(&"MAT-NEW".into(), MaterialStatus::Inactive);

        let err = ensure_active(&directory, 1, &"MAT-OLD".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::MaterialNotActive {
                status: MaterialStatus::Deprecated,
                ..
            }
        ));

        let err = ensure_active(&directory, 1, &"MAT-NEW".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::MaterialNotActive {
                status: MaterialStatus::Inactive,
                ..
            }
        ));
    }

    #[test]
    fn status_display() {
        assert_eq!(MaterialStatus::Active.to_string(), "active");
        assert_eq!(MaterialStatus::Deprecated.to_string(), "deprecated");
    }
}
