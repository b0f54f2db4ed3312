//! Plain input payloads accepted by the workflow facade.
//!
//! These are the structures the surrounding service layer builds from request
//! data. Validation happens in the lifecycle managers; the payloads themselves
//! carry no invariants.

use chrono::NaiveDate;
use common::MaterialId;
use rust_decimal::Decimal;

use crate::error::WorkflowError;
use crate::types::ProcurementType;

/// Header fields of a requisition.
#[derive(Debug, Clone)]
pub struct RequisitionFields {
    /// What is being requested.
    pub description: String,

    /// Who is requesting it.
    pub requester: String,

    /// Requesting department, if any.
    pub department: Option<String>,

    /// How the goods are procured.
    pub procurement_type: ProcurementType,

    /// Urgency flag.
    pub urgent: bool,
}

impl RequisitionFields {
    /// Creates requisition fields with defaults for the optional parts.
    pub fn new(description: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            requester: requester.into(),
            department: None,
            procurement_type: ProcurementType::default(),
            urgent: false,
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the procurement type.
    pub fn with_procurement_type(mut self, procurement_type: ProcurementType) -> Self {
        self.procurement_type = procurement_type;
        self
    }

    /// Marks the requisition urgent.
    pub fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }
}

/// Header fields of an order.
#[derive(Debug, Clone)]
pub struct OrderFields {
    /// What is being ordered.
    pub description: String,

    /// Who is ordering it.
    pub requester: String,

    /// The vendor the order is sent to. Required.
    pub vendor: String,

    /// Agreed payment terms, if any.
    pub payment_terms: Option<String>,

    /// How the goods are procured.
    pub procurement_type: ProcurementType,

    /// Urgency flag.
    pub urgent: bool,
}

impl OrderFields {
    /// Creates order fields with defaults for the optional parts.
    pub fn new(
        description: impl Into<String>,
        requester: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            requester: requester.into(),
            vendor: vendor.into(),
            payment_terms: None,
            procurement_type: ProcurementType::default(),
            urgent: false,
        }
    }

    /// Sets the payment terms.
    pub fn with_payment_terms(mut self, payment_terms: impl Into<String>) -> Self {
        self.payment_terms = Some(payment_terms.into());
        self
    }

    /// Sets the procurement type.
    pub fn with_procurement_type(mut self, procurement_type: ProcurementType) -> Self {
        self.procurement_type = procurement_type;
        self
    }

    /// Marks the order urgent.
    pub fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }
}

/// One item line as supplied by the caller.
#[derive(Debug, Clone)]
pub struct ItemFields {
    /// Optional reference into the material directory.
    pub material: Option<MaterialId>,

    /// Free-text description of the good or service.
    pub description: String,

    /// Requested quantity. Must be positive.
    pub quantity: Decimal,

    /// Unit of measure.
    pub unit: String,

    /// Price per unit. Must not be negative.
    pub unit_price: Decimal,

    /// Price currency.
    pub currency: String,

    /// Requested delivery date. Only meaningful on order items.
    pub delivery_date: Option<NaiveDate>,
}

impl ItemFields {
    /// Creates an item line with currency defaulting to USD.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            material: None,
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            currency: "USD".to_string(),
            delivery_date: None,
        }
    }

    /// Sets the material reference.
    pub fn with_material(mut self, material: impl Into<MaterialId>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Sets the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Sets the requested delivery date.
    pub fn with_delivery_date(mut self, delivery_date: NaiveDate) -> Self {
        self.delivery_date = Some(delivery_date);
        self
    }

    /// Checks the field-level invariants of one line.
    ///
    /// `position` is the 1-based position of the line in the submitted list
    /// and is carried into every error.
    pub(crate) fn validate(&self, position: usize) -> Result<(), WorkflowError> {
        if self.description.trim().is_empty() {
            return Err(WorkflowError::MissingItemDescription { item: position });
        }
        if self.quantity <= Decimal::ZERO {
            return Err(WorkflowError::InvalidQuantity {
                item: position,
                quantity: self.quantity,
            });
        }
        if self.unit_price < Decimal::ZERO {
            return Err(WorkflowError::InvalidPrice {
                item: position,
                price: self.unit_price,
            });
        }
        Ok(())
    }
}

/// One line of a goods receipt: a received-quantity delta against an order item.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    /// The order item the delivery is booked against.
    pub item_number: u32,

    /// Quantity received in this delivery. Must be positive.
    pub quantity: Decimal,
}

impl ReceiptLine {
    /// Creates a receipt line.
    pub fn new(item_number: u32, quantity: Decimal) -> Self {
        Self {
            item_number,
            quantity,
        }
    }
}
