//! Workflow facade: the single entry point for all document mutations.
//!
//! Every operation follows the same shape: load the document(s) from the
//! state store, delegate to the lifecycle operation, and write the result
//! back only on success. A failed validation or transition never reaches
//! the store.
//!
//! The one cross-document operation, [`Workflow::create_order_from_requisition`],
//! writes two documents without global atomicity: the order first, then the
//! requisition with its items assigned. A crash between the two writes leaves
//! an order whose requisition does not yet reflect the assignment; consistency
//! checkers should treat that window as a known compensating-action case and
//! re-run reconciliation rather than assume the pair is written atomically.

use common::{DocumentKey, DocumentKind, DocumentNumber};
use state_store::{StateStore, StateStoreExt};

use crate::commands::{ItemFields, OrderFields, ReceiptLine, RequisitionFields};
use crate::error::{Result, WorkflowError};
use crate::material::MaterialDirectory;
use crate::order::{Order, OrderManager};
use crate::requisition::{Requisition, RequisitionManager};

/// Composes the lifecycle managers and the state store.
///
/// Controllers and the simulation harness talk to this type only; documents
/// are never mutated around it.
pub struct Workflow<S, M> {
    store: S,
    requisitions: RequisitionManager<M>,
    orders: OrderManager<M>,
}

impl<S, M> Workflow<S, M>
where
    S: StateStore,
    M: MaterialDirectory + Clone,
{
    /// Creates a new facade over the given store and material directory.
    pub fn new(store: S, materials: M) -> Self {
        Self {
            store,
            requisitions: RequisitionManager::new(materials.clone()),
            orders: OrderManager::new(materials),
        }
    }

    /// Returns a reference to the underlying state store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

// Requisition operations
impl<S, M> Workflow<S, M>
where
    S: StateStore,
    M: MaterialDirectory + Clone,
{
    /// Creates a requisition in Draft with a store-issued document number.
    #[tracing::instrument(skip(self))]
    pub async fn create_requisition(
        &self,
        fields: RequisitionFields,
        items: Vec<ItemFields>,
    ) -> Result<Requisition> {
        let number = self.store.next_number(DocumentKind::Requisition).await?;
        let requisition = self.requisitions.create(number, fields, items).await?;
        self.write_requisition(&requisition).await?;
        metrics::counter!("workflow_requisitions_created_total").increment(1);
        Ok(requisition)
    }

    /// Replaces the fields and items of a Draft requisition.
    #[tracing::instrument(skip(self))]
    pub async fn update_requisition(
        &self,
        number: &DocumentNumber,
        fields: RequisitionFields,
        items: Vec<ItemFields>,
    ) -> Result<Requisition> {
        let current = self.load_requisition(number).await?;
        let updated = self.requisitions.update(&current, fields, items).await?;
        self.write_requisition(&updated).await?;
        Ok(updated)
    }

    /// Submits a requisition for approval.
    #[tracing::instrument(skip(self))]
    pub async fn submit_requisition(&self, number: &DocumentNumber) -> Result<Requisition> {
        let updated = self.load_requisition(number).await?.submit()?;
        self.write_requisition(&updated).await?;
        Ok(updated)
    }

    /// Approves a submitted requisition.
    #[tracing::instrument(skip(self))]
    pub async fn approve_requisition(&self, number: &DocumentNumber) -> Result<Requisition> {
        let updated = self.load_requisition(number).await?.approve()?;
        self.write_requisition(&updated).await?;
        Ok(updated)
    }

    /// Rejects a submitted requisition with a non-empty reason.
    #[tracing::instrument(skip(self))]
    pub async fn reject_requisition(
        &self,
        number: &DocumentNumber,
        reason: &str,
    ) -> Result<Requisition> {
        let updated = self.load_requisition(number).await?.reject(reason)?;
        self.write_requisition(&updated).await?;
        Ok(updated)
    }

    /// Cancels a Draft or Approved requisition.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_requisition(&self, number: &DocumentNumber) -> Result<Requisition> {
        let updated = self.load_requisition(number).await?.cancel()?;
        self.write_requisition(&updated).await?;
        Ok(updated)
    }

    /// Loads a requisition.
    #[tracing::instrument(skip(self))]
    pub async fn get_requisition(&self, number: &DocumentNumber) -> Result<Requisition> {
        self.load_requisition(number).await
    }

    /// Lists all requisitions, sorted by document number.
    ///
    /// Read-only enumeration for dashboards and monitoring.
    #[tracing::instrument(skip(self))]
    pub async fn list_requisitions(&self) -> Result<Vec<Requisition>> {
        Ok(self
            .store
            .list_typed(DocumentKind::Requisition)
            .await?)
    }
}

// Order operations
impl<S, M> Workflow<S, M>
where
    S: StateStore,
    M: MaterialDirectory + Clone,
{
    /// Creates an order in Draft with a store-issued document number.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(
        &self,
        fields: OrderFields,
        items: Vec<ItemFields>,
    ) -> Result<Order> {
        let number = self.store.next_number(DocumentKind::Order).await?;
        let order = self.orders.create(number, fields, items).await?;
        self.write_order(&order).await?;
        metrics::counter!("workflow_orders_created_total").increment(1);
        Ok(order)
    }

    /// Converts an Approved requisition into a new Draft order.
    ///
    /// All items are copied 1:1 and the requisition's items are assigned to
    /// the new order; since every item is assigned, the requisition moves to
    /// Ordered. Both documents are fully validated before the first write.
    /// The order is written first, then the requisition (see the module docs
    /// for the non-atomic window).
    #[tracing::instrument(skip(self))]
    pub async fn create_order_from_requisition(
        &self,
        requisition_number: &DocumentNumber,
        vendor: &str,
        payment_terms: Option<String>,
    ) -> Result<Order> {
        let requisition = self.load_requisition(requisition_number).await?;

        let number = self.store.next_number(DocumentKind::Order).await?;
        let order = Order::from_requisition(number, &requisition, vendor, payment_terms)?;

        let item_numbers: Vec<u32> = order.items().iter().map(|i| i.item_number).collect();
        let assigned = requisition.mark_items_ordered(&item_numbers, order.number())?;

        self.write_order(&order).await?;
        self.write_requisition(&assigned).await?;
        metrics::counter!("workflow_orders_created_total").increment(1);
        Ok(order)
    }

    /// Replaces the fields and items of a Draft order.
    #[tracing::instrument(skip(self))]
    pub async fn update_order(
        &self,
        number: &DocumentNumber,
        fields: OrderFields,
        items: Vec<ItemFields>,
    ) -> Result<Order> {
        let current = self.load_order(number).await?;
        let updated = self.orders.update(&current, fields, items).await?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Submits an order for approval.
    #[tracing::instrument(skip(self))]
    pub async fn submit_order(&self, number: &DocumentNumber) -> Result<Order> {
        let updated = self.load_order(number).await?.submit()?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Approves a submitted order.
    #[tracing::instrument(skip(self))]
    pub async fn approve_order(&self, number: &DocumentNumber) -> Result<Order> {
        let updated = self.load_order(number).await?.approve()?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Rejects a submitted order with a non-empty reason.
    #[tracing::instrument(skip(self))]
    pub async fn reject_order(&self, number: &DocumentNumber, reason: &str) -> Result<Order> {
        let updated = self.load_order(number).await?.reject(reason)?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Cancels a Draft or Approved order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, number: &DocumentNumber) -> Result<Order> {
        let updated = self.load_order(number).await?.cancel()?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Books a goods receipt against an order.
    ///
    /// The batch is all-or-nothing, and each call adds deltas: re-issuing
    /// the same batch books the delivery twice, so retries must be
    /// deduplicated by the caller.
    #[tracing::instrument(skip(self))]
    pub async fn receive_items(
        &self,
        number: &DocumentNumber,
        receipts: Vec<ReceiptLine>,
    ) -> Result<Order> {
        let updated = self.load_order(number).await?.receive(&receipts)?;
        self.write_order(&updated).await?;
        metrics::counter!("workflow_receipts_booked_total").increment(1);
        Ok(updated)
    }

    /// Completes a fully received order.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self, number: &DocumentNumber) -> Result<Order> {
        let updated = self.load_order(number).await?.complete()?;
        self.write_order(&updated).await?;
        Ok(updated)
    }

    /// Loads an order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, number: &DocumentNumber) -> Result<Order> {
        self.load_order(number).await
    }

    /// Lists all orders, sorted by document number.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.list_typed(DocumentKind::Order).await?)
    }
}

// Store access helpers
impl<S, M> Workflow<S, M>
where
    S: StateStore,
    M: MaterialDirectory + Clone,
{
    async fn load_requisition(&self, number: &DocumentNumber) -> Result<Requisition> {
        self.store
            .get_typed(&DocumentKey::requisition(number.clone()))
            .await?
            .ok_or_else(|| WorkflowError::NotFound {
                kind: DocumentKind::Requisition,
                number: number.clone(),
            })
    }

    async fn write_requisition(&self, requisition: &Requisition) -> Result<()> {
        self.store
            .set_typed(
                DocumentKey::requisition(requisition.number().clone()),
                requisition,
            )
            .await?;
        Ok(())
    }

    async fn load_order(&self, number: &DocumentNumber) -> Result<Order> {
        self.store
            .get_typed(&DocumentKey::order(number.clone()))
            .await?
            .ok_or_else(|| WorkflowError::NotFound {
                kind: DocumentKind::Order,
                number: number.clone(),
            })
    }

    async fn write_order(&self, order: &Order) -> Result<()> {
        self.store
            .set_typed(DocumentKey::order(order.number().clone()), order)
            .await?;
        Ok(())
    }
}
