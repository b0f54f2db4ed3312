//! Order document and its lifecycle operations.

use chrono::{DateTime, NaiveDate, Utc};
use common::{DocumentNumber, ItemRef, MaterialId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commands::{OrderFields, ReceiptLine};
use crate::error::WorkflowError;
use crate::order::state::{OrderAction, OrderStatus};
use crate::reconcile::{self, Priced};
use crate::requisition::{Requisition, RequisitionStatus};
use crate::types::ProcurementType;

/// One item line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// 1-based sequential item number within the document.
    pub item_number: u32,

    /// Optional reference into the material directory.
    pub material: Option<MaterialId>,

    /// Free-text description of the good or service.
    pub description: String,

    /// Ordered quantity.
    pub quantity: Decimal,

    /// Cumulative received quantity. Never exceeds `quantity`.
    pub received: Decimal,

    /// Unit of measure.
    pub unit: String,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Price currency.
    pub currency: String,

    /// Requested delivery date, if agreed.
    pub delivery_date: Option<NaiveDate>,

    /// The requisition item this order item was converted from, when the
    /// order was created via requisition conversion.
    pub requisition_item: Option<ItemRef>,
}

impl OrderItem {
    /// Returns true if the full ordered quantity has been received.
    pub fn is_fully_received(&self) -> bool {
        self.received >= self.quantity
    }
}

impl Priced for OrderItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Order document.
///
/// Like [`Requisition`], every operation is a pure `&self -> Result<Self>`
/// transform; the state store owns the authoritative copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    number: DocumentNumber,
    description: String,
    requester: String,
    vendor: String,
    payment_terms: Option<String>,
    procurement_type: ProcurementType,
    urgent: bool,
    items: Vec<OrderItem>,
    status: OrderStatus,
    requisition_ref: Option<DocumentNumber>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Query methods
impl Order {
    /// Returns the document number.
    pub fn number(&self) -> &DocumentNumber {
        &self.number
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the requester identity.
    pub fn requester(&self) -> &str {
        &self.requester
    }

    /// Returns the vendor the order is addressed to.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Returns the payment terms, if any.
    pub fn payment_terms(&self) -> Option<&str> {
        self.payment_terms.as_deref()
    }

    /// Returns the procurement type.
    pub fn procurement_type(&self) -> ProcurementType {
        self.procurement_type
    }

    /// Returns true if the order is flagged urgent.
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Returns the item lines.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns an item by its 1-based item number.
    pub fn item(&self, item_number: u32) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.item_number == item_number)
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the requisition this order was converted from, if any.
    pub fn requisition_ref(&self) -> Option<&DocumentNumber> {
        self.requisition_ref.as_ref()
    }

    /// Returns the stored rejection reason, if the order was rejected.
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-update timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the total value, recomputed from the items.
    pub fn total_value(&self) -> Decimal {
        reconcile::total_value(&self.items)
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Lifecycle operations
impl Order {
    /// Creates a new order in Draft.
    ///
    /// Items must already be validated and numbered; the manager is
    /// responsible for both. The vendor is required non-empty.
    pub(crate) fn create(
        number: DocumentNumber,
        fields: OrderFields,
        items: Vec<OrderItem>,
    ) -> Result<Self, WorkflowError> {
        if fields.vendor.trim().is_empty() {
            return Err(WorkflowError::MissingVendor);
        }
        if items.is_empty() {
            return Err(WorkflowError::NoItems);
        }

        let now = Utc::now();
        Ok(Self {
            number,
            description: fields.description,
            requester: fields.requester,
            vendor: fields.vendor,
            payment_terms: fields.payment_terms,
            procurement_type: fields.procurement_type,
            urgent: fields.urgent,
            items,
            status: OrderStatus::Draft,
            requisition_ref: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a Draft order from an Approved requisition.
    ///
    /// Every requisition item is copied 1:1 (material, description, quantity,
    /// unit, price, currency) and stamped with a typed reference back to its
    /// originating requisition item. The requisition itself is not touched
    /// here; the facade drives the item assignment as a separate write.
    pub(crate) fn from_requisition(
        number: DocumentNumber,
        requisition: &Requisition,
        vendor: &str,
        payment_terms: Option<String>,
    ) -> Result<Self, WorkflowError> {
        if requisition.status() != RequisitionStatus::Approved {
            return Err(WorkflowError::InvalidTransition {
                number: requisition.number().clone(),
                current: requisition.status().as_str(),
                operation: "create order",
            });
        }
        if requisition.items().is_empty() {
            return Err(WorkflowError::NothingToConvert {
                number: requisition.number().clone(),
            });
        }
        if vendor.trim().is_empty() {
            return Err(WorkflowError::MissingVendor);
        }

        let items = requisition
            .items()
            .iter()
            .map(|source| OrderItem {
                item_number: source.item_number,
                material: source.material.clone(),
                description: source.description.clone(),
                quantity: source.quantity,
                received: Decimal::ZERO,
                unit: source.unit.clone(),
                unit_price: source.unit_price,
                currency: source.currency.clone(),
                delivery_date: None,
                requisition_item: Some(ItemRef::new(
                    requisition.number().clone(),
                    source.item_number,
                )),
            })
            .collect();

        let now = Utc::now();
        Ok(Self {
            number,
            description: requisition.description().to_string(),
            requester: requisition.requester().to_string(),
            vendor: vendor.to_string(),
            payment_terms,
            procurement_type: requisition.procurement_type(),
            urgent: requisition.is_urgent(),
            items,
            status: OrderStatus::Draft,
            requisition_ref: Some(requisition.number().clone()),
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces header fields and the full item list. Legal only in Draft.
    pub(crate) fn update(
        &self,
        fields: OrderFields,
        items: Vec<OrderItem>,
    ) -> Result<Self, WorkflowError> {
        if !self.status.can_modify_items() {
            return Err(self.illegal("update"));
        }
        if fields.vendor.trim().is_empty() {
            return Err(WorkflowError::MissingVendor);
        }
        if items.is_empty() {
            return Err(WorkflowError::NoItems);
        }

        let mut next = self.clone();
        next.description = fields.description;
        next.requester = fields.requester;
        next.vendor = fields.vendor;
        next.payment_terms = fields.payment_terms;
        next.procurement_type = fields.procurement_type;
        next.urgent = fields.urgent;
        next.items = items;
        next.updated_at = Utc::now();
        Ok(next)
    }

    /// Submits the order for approval.
    pub fn submit(&self) -> Result<Self, WorkflowError> {
        self.transitioned(OrderAction::Submit, "submit")
    }

    /// Approves a submitted order.
    pub fn approve(&self) -> Result<Self, WorkflowError> {
        self.transitioned(OrderAction::Approve, "approve")
    }

    /// Rejects a submitted order, storing the reason.
    pub fn reject(&self, reason: &str) -> Result<Self, WorkflowError> {
        let mut next = self.transitioned(OrderAction::Reject, "reject")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::EmptyRejectionReason {
                number: self.number.clone(),
            });
        }
        next.rejection_reason = Some(reason.to_string());
        Ok(next)
    }

    /// Cancels the order. Legal from Draft or Approved only.
    pub fn cancel(&self) -> Result<Self, WorkflowError> {
        self.transitioned(OrderAction::Cancel, "cancel")
    }

    /// Books a goods receipt: a batch of received-quantity deltas.
    ///
    /// The batch is all-or-nothing. Every line must name an existing item,
    /// carry a positive delta, and keep the item's cumulative received
    /// quantity within its ordered quantity; otherwise no line is applied.
    /// The resulting status is Received when every item is fully received,
    /// PartiallyReceived otherwise.
    ///
    /// Each call adds deltas, so re-issuing the same batch books the
    /// delivery twice; callers must deduplicate retries themselves.
    pub fn receive(&self, receipts: &[ReceiptLine]) -> Result<Self, WorkflowError> {
        if !self.status.can_receive() {
            return Err(self.illegal("receive items"));
        }
        if receipts.is_empty() {
            return Err(WorkflowError::EmptyReceipt {
                number: self.number.clone(),
            });
        }

        // Applied to a working copy; discarded wholesale on the first bad line.
        let mut next = self.clone();
        for line in receipts {
            if line.quantity <= Decimal::ZERO {
                return Err(WorkflowError::InvalidReceiptQuantity {
                    number: self.number.clone(),
                    item: line.item_number,
                    quantity: line.quantity,
                });
            }

            let item = next
                .items
                .iter_mut()
                .find(|i| i.item_number == line.item_number)
                .ok_or_else(|| WorkflowError::ItemNotFound {
                    number: self.number.clone(),
                    item: line.item_number,
                })?;

            let received = item.received + line.quantity;
            if received > item.quantity {
                return Err(WorkflowError::ReceiptExceedsOrdered {
                    number: self.number.clone(),
                    item: line.item_number,
                    ordered: item.quantity,
                    received: item.received,
                    delta: line.quantity,
                });
            }
            item.received = received;
        }

        let completeness = reconcile::receipt_completeness(&next.items);
        let action = OrderAction::Receive {
            complete: completeness.all_received,
        };
        next.status = self
            .status
            .transition(action)
            .ok_or_else(|| self.illegal("receive items"))?;
        next.updated_at = Utc::now();
        Ok(next)
    }

    /// Completes a fully received order (invoice/closure).
    pub fn complete(&self) -> Result<Self, WorkflowError> {
        self.transitioned(OrderAction::Complete, "complete")
    }

    fn transitioned(
        &self,
        action: OrderAction,
        operation: &'static str,
    ) -> Result<Self, WorkflowError> {
        let status = self
            .status
            .transition(action)
            .ok_or_else(|| self.illegal(operation))?;

        let mut next = self.clone();
        next.status = status;
        next.updated_at = Utc::now();
        Ok(next)
    }

    fn illegal(&self, operation: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            number: self.number.clone(),
            current: self.status.as_str(),
            operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RequisitionFields;
    use crate::requisition::{ItemStatus, RequisitionItem};

    fn item(item_number: u32, quantity: i64, unit_price: i64) -> OrderItem {
        OrderItem {
            item_number,
            material: None,
            description: format!("Item {item_number}"),
            quantity: Decimal::from(quantity),
            received: Decimal::ZERO,
            unit: "EA".to_string(),
            unit_price: Decimal::from(unit_price),
            currency: "USD".to_string(),
            delivery_date: None,
            requisition_item: None,
        }
    }

    fn draft() -> Order {
        Order::create(
            "PO-000001".into(),
            OrderFields::new("Spare parts", "alice", "Acme Corp"),
            vec![item(1, 10, 5)],
        )
        .unwrap()
    }

    fn approved() -> Order {
        draft().submit().unwrap().approve().unwrap()
    }

    fn approved_requisition() -> Requisition {
        let items = vec![
            RequisitionItem {
                item_number: 1,
                material: Some("MAT-001".into()),
                description: "Bolts".to_string(),
                quantity: Decimal::from(10),
                unit: "EA".to_string(),
                unit_price: Decimal::from(5),
                currency: "USD".to_string(),
                status: ItemStatus::Open,
                order_ref: None,
            },
            RequisitionItem {
                item_number: 2,
                material: None,
                description: "Washers".to_string(),
                quantity: Decimal::from(3),
                unit: "EA".to_string(),
                unit_price: Decimal::from(20),
                currency: "USD".to_string(),
                status: ItemStatus::Open,
                order_ref: None,
            },
        ];
        Requisition::create(
            "PR-000001".into(),
            RequisitionFields::new("Maintenance stock", "bob"),
            items,
        )
        .unwrap()
        .submit()
        .unwrap()
        .approve()
        .unwrap()
    }

    #[test]
    fn create_requires_vendor() {
        let result = Order::create(
            "PO-000001".into(),
            OrderFields::new("Spare parts", "alice", "  "),
            vec![item(1, 1, 1)],
        );
        assert!(matches!(result, Err(WorkflowError::MissingVendor)));
    }

    #[test]
    fn create_requires_items() {
        let result = Order::create(
            "PO-000001".into(),
            OrderFields::new("Spare parts", "alice", "Acme Corp"),
            vec![],
        );
        assert!(matches!(result, Err(WorkflowError::NoItems)));
    }

    #[test]
    fn full_lifecycle_to_completed() {
        let order = approved();
        let order = order
            .receive(&[ReceiptLine::new(1, Decimal::from(10))])
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Received);

        let order = order.complete().unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);
        assert!(order.is_terminal());
    }

    #[test]
    fn partial_receipt_then_completion_of_quantity() {
        let order = approved();

        let order = order
            .receive(&[ReceiptLine::new(1, Decimal::from(6))])
            .unwrap();
        assert_eq!(order.status(), OrderStatus::PartiallyReceived);
        assert_eq!(order.item(1).unwrap().received, Decimal::from(6));

        let order = order
            .receive(&[ReceiptLine::new(1, Decimal::from(4))])
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Received);
        assert_eq!(order.item(1).unwrap().received, Decimal::from(10));
    }

    #[test]
    fn overshooting_receipt_is_unprocessable_and_changes_nothing() {
        let order = approved()
            .receive(&[ReceiptLine::new(1, Decimal::from(10))])
            .unwrap();
        let before = order.clone();

        let result = order.receive(&[ReceiptLine::new(1, Decimal::ONE)]);
        assert!(matches!(
            result,
            Err(WorkflowError::ReceiptExceedsOrdered {
                item: 1,
                ..
            })
        ));
        assert_eq!(order, before);
        assert_eq!(order.item(1).unwrap().received, Decimal::from(10));
    }

    #[test]
    fn receipt_batch_is_all_or_nothing() {
        let order = Order::create(
            "PO-000001".into(),
            OrderFields::new("Spare parts", "alice", "Acme Corp"),
            vec![item(1, 10, 5), item(2, 4, 3)],
        )
        .unwrap()
        .submit()
        .unwrap()
        .approve()
        .unwrap();

        // Second line overshoots; the first line must not stick.
        let result = order.receive(&[
            ReceiptLine::new(1, Decimal::from(5)),
            ReceiptLine::new(2, Decimal::from(9)),
        ]);
        assert!(matches!(
            result,
            Err(WorkflowError::ReceiptExceedsOrdered { item: 2, .. })
        ));
        assert_eq!(order.item(1).unwrap().received, Decimal::ZERO);
        assert_eq!(order.status(), OrderStatus::Approved);
    }

    #[test]
    fn receipt_rejects_unknown_item_and_bad_delta() {
        let order = approved();

        let result = order.receive(&[ReceiptLine::new(9, Decimal::ONE)]);
        assert!(matches!(
            result,
            Err(WorkflowError::ItemNotFound { item: 9, .. })
        ));

        let result = order.receive(&[ReceiptLine::new(1, Decimal::ZERO)]);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidReceiptQuantity { item: 1, .. })
        ));

        let result = order.receive(&[]);
        assert!(matches!(result, Err(WorkflowError::EmptyReceipt { .. })));
    }

    #[test]
    fn receive_requires_approved_or_partially_received() {
        let result = draft().receive(&[ReceiptLine::new(1, Decimal::ONE)]);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition {
                operation: "receive items",
                current: "Draft",
                ..
            })
        ));
    }

    #[test]
    fn complete_requires_received() {
        let order = approved();
        let result = order.complete();
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition {
                operation: "complete",
                current: "Approved",
                ..
            })
        ));
    }

    #[test]
    fn cancel_only_from_draft_or_approved() {
        assert!(draft().cancel().is_ok());
        assert!(approved().cancel().is_ok());

        let partially = approved()
            .receive(&[ReceiptLine::new(1, Decimal::from(2))])
            .unwrap();
        assert!(partially.cancel().is_err());
    }

    #[test]
    fn reject_requires_reason() {
        let submitted = draft().submit().unwrap();
        assert!(matches!(
            submitted.reject(""),
            Err(WorkflowError::EmptyRejectionReason { .. })
        ));

        let rejected = submitted.reject("wrong vendor").unwrap();
        assert_eq!(rejected.status(), OrderStatus::Rejected);
        assert_eq!(rejected.rejection_reason(), Some("wrong vendor"));
    }

    #[test]
    fn from_requisition_copies_items_with_provenance() {
        let requisition = approved_requisition();
        let order = Order::from_requisition(
            "PO-000001".into(),
            &requisition,
            "Acme Corp",
            Some("NET30".to_string()),
        )
        .unwrap();

        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.vendor(), "Acme Corp");
        assert_eq!(order.payment_terms(), Some("NET30"));
        assert_eq!(order.requisition_ref(), Some(requisition.number()));
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total_value(), requisition.total_value());

        for (order_item, source) in order.items().iter().zip(requisition.items()) {
            assert_eq!(order_item.quantity, source.quantity);
            assert_eq!(order_item.unit_price, source.unit_price);
            assert_eq!(order_item.description, source.description);
            assert_eq!(order_item.material, source.material);
            assert_eq!(order_item.received, Decimal::ZERO);
            assert_eq!(
                order_item.requisition_item,
                Some(ItemRef::new(
                    requisition.number().clone(),
                    source.item_number
                ))
            );
        }
    }

    #[test]
    fn from_requisition_requires_approved_source() {
        let requisition = approved_requisition();
        let ordered = requisition
            .mark_items_ordered(&[1, 2], &"PO-000009".into())
            .unwrap();

        let result = Order::from_requisition("PO-000010".into(), &ordered, "Acme Corp", None);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition {
                operation: "create order",
                current: "Ordered",
                ..
            })
        ));
    }

    #[test]
    fn from_requisition_requires_vendor() {
        let requisition = approved_requisition();
        let result = Order::from_requisition("PO-000001".into(), &requisition, "", None);
        assert!(matches!(result, Err(WorkflowError::MissingVendor)));
    }

    #[test]
    fn serialization_roundtrip_preserves_every_field() {
        let order = approved()
            .receive(&[ReceiptLine::new(1, Decimal::from(4))])
            .unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, order);
    }
}
