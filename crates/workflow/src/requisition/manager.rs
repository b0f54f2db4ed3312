//! Requisition item validation and construction.

use common::DocumentNumber;

use crate::commands::{ItemFields, RequisitionFields};
use crate::error::WorkflowError;
use crate::material::{self, MaterialDirectory};
use crate::requisition::document::{Requisition, RequisitionItem};
use crate::requisition::state::ItemStatus;

/// Builds and revalidates requisitions against the material directory.
///
/// Transitions live on [`Requisition`] itself; the manager owns the parts
/// that need the directory: item validation on create and on the full item
/// replacement an update performs.
pub struct RequisitionManager<M> {
    materials: M,
}

impl<M: MaterialDirectory> RequisitionManager<M> {
    /// Creates a new manager backed by the given material directory.
    pub fn new(materials: M) -> Self {
        Self { materials }
    }

    /// Validates input and creates a new Draft requisition.
    pub async fn create(
        &self,
        number: DocumentNumber,
        fields: RequisitionFields,
        items: Vec<ItemFields>,
    ) -> Result<Requisition, WorkflowError> {
        let items = self.validated_items(items).await?;
        Requisition::create(number, fields, items)
    }

    /// Validates input and replaces fields and items of a Draft requisition.
    pub async fn update(
        &self,
        current: &Requisition,
        fields: RequisitionFields,
        items: Vec<ItemFields>,
    ) -> Result<Requisition, WorkflowError> {
        // Status gate first so a non-Draft document reports Conflict even
        // when the submitted items are also invalid.
        if !current.status().can_modify_items() {
            return Err(WorkflowError::InvalidTransition {
                number: current.number().clone(),
                current: current.status().as_str(),
                operation: "update",
            });
        }
        let items = self.validated_items(items).await?;
        current.update(fields, items)
    }

    /// Validates item input and assigns sequential item numbers from 1.
    async fn validated_items(
        &self,
        inputs: Vec<ItemFields>,
    ) -> Result<Vec<RequisitionItem>, WorkflowError> {
        if inputs.is_empty() {
            return Err(WorkflowError::NoItems);
        }

        let mut items = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            let position = index + 1;
            input.validate(position)?;
            if let Some(material) = &input.material {
                material::ensure_active(&self.materials, position, material).await?;
            }

            items.push(RequisitionItem {
                item_number: position as u32,
                material: input.material,
                description: input.description,
                quantity: input.quantity,
                unit: input.unit,
                unit_price: input.unit_price,
                currency: input.currency,
                status: ItemStatus::Open,
                order_ref: None,
            });
        }
        Ok(items)
    }
}
