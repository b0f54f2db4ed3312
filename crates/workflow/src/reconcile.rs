//! Cross-document reconciliation.
//!
//! Pure functions over item data: aggregate value, receipt completeness, and
//! the requisition-side effect of an order creation. Nothing here touches the
//! state store; callers own all reads and writes.

use common::DocumentNumber;
use rust_decimal::Decimal;

use crate::order::OrderItem;
use crate::requisition::{ItemStatus, Requisition, RequisitionItem};

/// A line item with a quantity and a unit price.
pub trait Priced {
    /// The line quantity.
    fn quantity(&self) -> Decimal;

    /// The price per unit.
    fn unit_price(&self) -> Decimal;

    /// The extended line value.
    fn line_value(&self) -> Decimal {
        self.quantity() * self.unit_price()
    }
}

/// Sums quantity × unit price across the items.
///
/// Used for both requisitions and orders; document types expose it as
/// `total_value()` so the total can never drift from the items.
pub fn total_value<T: Priced>(items: &[T]) -> Decimal {
    items.iter().map(Priced::line_value).sum()
}

/// Receipt state of one order item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReceipt {
    /// The 1-based item number.
    pub item_number: u32,

    /// Ordered quantity.
    pub ordered: Decimal,

    /// Cumulative received quantity.
    pub received: Decimal,

    /// Received as a fraction of ordered, between 0 and 1.
    pub ratio: Decimal,
}

impl ItemReceipt {
    /// Returns true if the full ordered quantity has been received.
    pub fn is_complete(&self) -> bool {
        self.received >= self.ordered
    }
}

/// Aggregate receipt state of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptCompleteness {
    /// Per-item receipt states, in item order.
    pub items: Vec<ItemReceipt>,

    /// True if every item is fully received.
    pub all_received: bool,

    /// True if any quantity has been received at all.
    pub any_received: bool,
}

/// Computes per-item and aggregate receipt completeness.
pub fn receipt_completeness(items: &[OrderItem]) -> ReceiptCompleteness {
    let item_receipts: Vec<ItemReceipt> = items
        .iter()
        .map(|item| {
            let ratio = if item.quantity.is_zero() {
                Decimal::ONE
            } else {
                item.received / item.quantity
            };
            ItemReceipt {
                item_number: item.item_number,
                ordered: item.quantity,
                received: item.received,
                ratio,
            }
        })
        .collect();

    let all_received = item_receipts.iter().all(ItemReceipt::is_complete);
    let any_received = item_receipts.iter().any(|r| r.received > Decimal::ZERO);

    ReceiptCompleteness {
        items: item_receipts,
        all_received,
        any_received,
    }
}

/// Computes the requisition item list after some of its items are assigned to
/// an order.
///
/// The named items get status Assigned and the order back-reference; all
/// other items are carried over unchanged. The input requisition is not
/// mutated; the caller decides whether and when to write the result.
/// Item numbers not present in the requisition are ignored here; the
/// lifecycle operation validates them beforehand.
pub fn propagate_order_creation(
    requisition: &Requisition,
    order_number: &DocumentNumber,
    item_numbers: &[u32],
) -> Vec<RequisitionItem> {
    requisition
        .items()
        .iter()
        .map(|item| {
            if item_numbers.contains(&item.item_number) {
                let mut assigned = item.clone();
                assigned.status = ItemStatus::Assigned;
                assigned.order_ref = Some(order_number.clone());
                assigned
            } else {
                item.clone()
            }
        })
        .collect()
}
