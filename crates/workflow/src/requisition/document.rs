//! Requisition document and its lifecycle operations.

use chrono::{DateTime, Utc};
use common::{DocumentNumber, MaterialId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commands::RequisitionFields;
use crate::error::WorkflowError;
use crate::reconcile::{self, Priced};
use crate::requisition::state::{ItemStatus, RequisitionAction, RequisitionStatus};
use crate::types::ProcurementType;

/// One item line of a requisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionItem {
    /// 1-based sequential item number within the document.
    pub item_number: u32,

    /// Optional reference into the material directory. Validated at creation
    /// time; never revalidated afterwards.
    pub material: Option<MaterialId>,

    /// Free-text description of the good or service.
    pub description: String,

    /// Requested quantity.
    pub quantity: Decimal,

    /// Unit of measure.
    pub unit: String,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Price currency.
    pub currency: String,

    /// Whether the item is open, assigned to an order, or canceled.
    pub status: ItemStatus,

    /// Number of the order the item is assigned to.
    ///
    /// Present if and only if `status` is [`ItemStatus::Assigned`].
    pub order_ref: Option<DocumentNumber>,
}

impl Priced for RequisitionItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Requisition document.
///
/// The state store owns the authoritative copy; every operation here is a
/// pure `&self -> Result<Self>` transform that validates against the current
/// state and returns the next state. On error, the input is untouched and no
/// next state exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requisition {
    number: DocumentNumber,
    description: String,
    requester: String,
    department: Option<String>,
    procurement_type: ProcurementType,
    urgent: bool,
    items: Vec<RequisitionItem>,
    status: RequisitionStatus,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Query methods
impl Requisition {
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

    /// Returns the requesting department, if any.
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns the procurement type.
    pub fn procurement_type(&self) -> ProcurementType {
        self.procurement_type
    }

    /// Returns true if the requisition is flagged urgent.
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Returns the item lines.
    pub fn items(&self) -> &[RequisitionItem] {
        &self.items
    }

    /// Returns an item by its 1-based item number.
    pub fn item(&self, item_number: u32) -> Option<&RequisitionItem> {
        self.items.iter().find(|i| i.item_number == item_number)
    }

    /// Returns the current status.
    pub fn status(&self) -> RequisitionStatus {
        self.status
    }

    /// Returns the stored rejection reason, if the requisition was rejected.
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

    /// Returns true if the requisition is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Lifecycle operations
impl Requisition {
    /// Creates a new requisition in Draft.
    ///
    /// Items must already be validated and numbered sequentially from 1; the
    /// manager is responsible for both.
    pub(crate) fn create(
        number: DocumentNumber,
        fields: RequisitionFields,
        items: Vec<RequisitionItem>,
    ) -> Result<Self, WorkflowError> {
        if items.is_empty() {
            return Err(WorkflowError::NoItems);
        }

        let now = Utc::now();
        Ok(Self {
            number,
            description: fields.description,
            requester: fields.requester,
            department: fields.department,
            procurement_type: fields.procurement_type,
            urgent: fields.urgent,
            items,
            status: RequisitionStatus::Draft,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces header fields and the full item list. Legal only in Draft.
    pub(crate) fn update(
        &self,
        fields: RequisitionFields,
        items: Vec<RequisitionItem>,
    ) -> Result<Self, WorkflowError> {
        if !self.status.can_modify_items() {
            return Err(self.illegal("update"));
        }
        if items.is_empty() {
            return Err(WorkflowError::NoItems);
        }

        let mut next = self.clone();
        next.description = fields.description;
        next.requester = fields.requester;
        next.department = fields.department;
        next.procurement_type = fields.procurement_type;
        next.urgent = fields.urgent;
        next.items = items;
        next.updated_at = Utc::now();
        Ok(next)
    }

    /// Submits the requisition for approval.
    pub fn submit(&self) -> Result<Self, WorkflowError> {
        self.transitioned(RequisitionAction::Submit, "submit")
    }

    /// Approves a submitted requisition.
    pub fn approve(&self) -> Result<Self, WorkflowError> {
        self.transitioned(RequisitionAction::Approve, "approve")
    }

    /// Rejects a submitted requisition, storing the reason.
    ///
    /// The reason is required non-empty.
    pub fn reject(&self, reason: &str) -> Result<Self, WorkflowError> {
        let mut next = self.transitioned(RequisitionAction::Reject, "reject")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::EmptyRejectionReason {
                number: self.number.clone(),
            });
        }
        next.rejection_reason = Some(reason.to_string());
        Ok(next)
    }

    /// Cancels the requisition. Legal from Draft or Approved only.
    ///
    /// Still-open items are marked canceled along with the document.
    pub fn cancel(&self) -> Result<Self, WorkflowError> {
        let mut next = self.transitioned(RequisitionAction::Cancel, "cancel")?;
        for item in &mut next.items {
            if item.status == ItemStatus::Open {
                item.status = ItemStatus::Canceled;
            }
        }
        Ok(next)
    }

    /// Assigns the given items to an order.
    ///
    /// Internal operation driven by the facade during order-from-requisition
    /// conversion. Each named item gets status Assigned and the order
    /// back-reference. Once *all* items are assigned, the requisition itself
    /// moves to Ordered; a partial assignment leaves it Approved. (Observed
    /// behavior of the source system, preserved pending product confirmation
    /// that partial conversion is intended to keep the document status.)
    pub(crate) fn mark_items_ordered(
        &self,
        item_numbers: &[u32],
        order_number: &DocumentNumber,
    ) -> Result<Self, WorkflowError> {
        if self.status != RequisitionStatus::Approved {
            return Err(self.illegal("mark items ordered"));
        }

        for &item_number in item_numbers {
            let item = self
                .item(item_number)
                .ok_or_else(|| WorkflowError::ItemNotFound {
                    number: self.number.clone(),
                    item: item_number,
                })?;
            if let Some(order) = &item.order_ref {
                return Err(WorkflowError::ItemAlreadyAssigned {
                    number: self.number.clone(),
                    item: item_number,
                    order: order.clone(),
                });
            }
        }

        let mut next = self.clone();
        next.items = reconcile::propagate_order_creation(self, order_number, item_numbers);
        if next.items.iter().all(|i| i.status == ItemStatus::Assigned) {
            next.status = self
                .status
                .transition(RequisitionAction::MarkOrdered)
                .ok_or_else(|| self.illegal("mark items ordered"))?;
        }
        next.updated_at = Utc::now();
        Ok(next)
    }

    fn transitioned(
        &self,
        action: RequisitionAction,
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
