//! Order item validation and construction.

use common::DocumentNumber;
use rust_decimal::Decimal;

use crate::commands::{ItemFields, OrderFields};
use crate::error::WorkflowError;
use crate::material::{self, MaterialDirectory};
use crate::order::document::{Order, OrderItem};

/// Builds and revalidates orders against the material directory.
///
/// Mirrors [`crate::requisition::RequisitionManager`]: transitions live on
/// [`Order`], the manager owns item validation for create and update.
pub struct OrderManager<M> {
    materials: M,
}

impl<M: MaterialDirectory> OrderManager<M> {
    /// Creates a new manager backed by the given material directory.
    pub fn new(materials: M) -> Self {
        Self { materials }
    }

    /// Validates input and creates a new Draft order.
    pub async fn create(
        &self,
        number: DocumentNumber,
        fields: OrderFields,
        items: Vec<ItemFields>,
    ) -> Result<Order, WorkflowError> {
        let items = self.validated_items(items).await?;
        Order::create(number, fields, items)
    }

    /// Validates input and replaces fields and items of a Draft order.
    pub async fn update(
        &self,
        current: &Order,
        fields: OrderFields,
        items: Vec<ItemFields>,
    ) -> Result<Order, WorkflowError> {
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
    ) -> Result<Vec<OrderItem>, WorkflowError> {
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

            items.push(OrderItem {
                item_number: position as u32,
                material: input.material,
                description: input.description,
                quantity: input.quantity,
                received: Decimal::ZERO,
                unit: input.unit,
                unit_price: input.unit_price,
                currency: input.currency,
                delivery_date: input.delivery_date,
                requisition_item: None,
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::InMemoryMaterialDirectory;
    use crate::order::state::OrderStatus;
    use chrono::NaiveDate;

    fn directory() -> InMemoryMaterialDirectory {
        let directory = InMemoryMaterialDirectory::new();
        directory.insert_active("MAT-001", "Steel bolt M8");
        directory
    }

    #[tokio::test]
    async fn create_builds_draft_order_with_numbered_items() {
        let manager = OrderManager::new(directory());

        let order = manager
            .create(
                "PO-000001".into(),
                OrderFields::new("Spare parts", "alice", "Acme Corp"),
                vec![
                    ItemFields::new("Bolts", Decimal::from(100), "EA", Decimal::ONE)
                        .with_material("MAT-001")
                        .with_delivery_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
                    ItemFields::new("Grease", Decimal::from(2), "KG", Decimal::from(12)),
                ],
            )
            .await
            .unwrap();

        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[0].item_number, 1);
        assert_eq!(
            order.items()[0].delivery_date,
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        assert_eq!(order.items()[1].item_number, 2);
        assert!(order.items().iter().all(|i| i.received == Decimal::ZERO));
    }

    #[tokio::test]
    async fn create_rejects_missing_vendor() {
        let manager = OrderManager::new(directory());
        let err = manager
            .create(
                "PO-000001".into(),
                OrderFields::new("Spare parts", "alice", ""),
                vec![ItemFields::new("Bolts", Decimal::ONE, "EA", Decimal::ONE)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::MissingVendor));
    }

    #[tokio::test]
    async fn create_rejects_unknown_material() {
        let manager = OrderManager::new(directory());
        let err = manager
            .create(
                "PO-000001".into(),
                OrderFields::new("Spare parts", "alice", "Acme Corp"),
                vec![
                    ItemFields::new("Mystery", Decimal::ONE, "EA", Decimal::ONE)
                        .with_material("MAT-404"),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownMaterial { item: 1, .. }));
    }

    #[tokio::test]
    async fn update_on_submitted_reports_conflict() {
        let manager = OrderManager::new(directory());
        let submitted = manager
            .create(
                "PO-000001".into(),
                OrderFields::new("Spare parts", "alice", "Acme Corp"),
                vec![ItemFields::new("Bolts", Decimal::ONE, "EA", Decimal::ONE)],
            )
            .await
            .unwrap()
            .submit()
            .unwrap();

        let err = manager
            .update(
                &submitted,
                OrderFields::new("Changed", "alice", "Acme Corp"),
                vec![ItemFields::new("Bolts", Decimal::ONE, "EA", Decimal::ONE)],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                operation: "update",
                current: "Submitted",
                ..
            }
        ));
    }
}
