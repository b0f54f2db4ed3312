//! Workflow error types.

use common::{DocumentKind, DocumentNumber, MaterialId};
use rust_decimal::Decimal;
use state_store::StateStoreError;
use thiserror::Error;

use crate::material::MaterialStatus;

/// Errors that can occur during workflow operations.
///
/// Every variant carries the document number when one is known and the
/// offending item position where one applies, so callers can render an
/// actionable message without re-deriving context. Item positions are
/// 1-based, matching document item numbers.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No document exists under the given number.
    #[error("{kind} not found: {number}")]
    NotFound {
        kind: DocumentKind,
        number: DocumentNumber,
    },

    /// The operation is not legal from the document's current status.
    #[error("cannot {operation} {number}: document is {current}")]
    InvalidTransition {
        number: DocumentNumber,
        current: &'static str,
        operation: &'static str,
    },

    /// A document must contain at least one item.
    #[error("document must contain at least one item")]
    NoItems,

    /// Item description is required.
    #[error("item {item}: description is required")]
    MissingItemDescription { item: usize },

    /// Item quantity must be positive.
    #[error("item {item}: quantity must be greater than zero (got {quantity})")]
    InvalidQuantity { item: usize, quantity: Decimal },

    /// Item unit price must not be negative.
    #[error("item {item}: unit price must not be negative (got {price})")]
    InvalidPrice { item: usize, price: Decimal },

    /// Orders require a vendor.
    #[error("vendor is required")]
    MissingVendor,

    /// Rejections require a reason.
    #[error("cannot reject {number}: rejection reason must not be empty")]
    EmptyRejectionReason { number: DocumentNumber },

    /// The referenced material does not exist in the material directory.
    #[error("item {item}: unknown material {material}")]
    UnknownMaterial { item: usize, material: MaterialId },

    /// Only active materials may be referenced by new items.
    #[error("item {item}: material {material} is {status}, only active materials may be referenced")]
    MaterialNotActive {
        item: usize,
        material: MaterialId,
        status: MaterialStatus,
    },

    /// The document has no item with the given number.
    #[error("{number} has no item {item}")]
    ItemNotFound { number: DocumentNumber, item: u32 },

    /// The requisition item is already assigned to an order.
    #[error("item {item} of {number} is already assigned to {order}")]
    ItemAlreadyAssigned {
        number: DocumentNumber,
        item: u32,
        order: DocumentNumber,
    },

    /// The requisition has no items to convert into an order.
    #[error("cannot create an order from {number}: requisition has no items")]
    NothingToConvert { number: DocumentNumber },

    /// A receipt batch must contain at least one line.
    #[error("cannot receive items for {number}: no receipt lines given")]
    EmptyReceipt { number: DocumentNumber },

    /// Receipt deltas must be positive.
    #[error("item {item} of {number}: receipt quantity must be greater than zero (got {quantity})")]
    InvalidReceiptQuantity {
        number: DocumentNumber,
        item: u32,
        quantity: Decimal,
    },

    /// The receipt would push cumulative received quantity past the ordered
    /// quantity. The whole batch is discarded.
    #[error(
        "item {item} of {number}: receiving {delta} would exceed ordered quantity \
         ({received} of {ordered} already received)"
    )]
    ReceiptExceedsOrdered {
        number: DocumentNumber,
        item: u32,
        ordered: Decimal,
        received: Decimal,
        delta: Decimal,
    },

    /// A state store error occurred.
    #[error("state store error: {0}")]
    Store(#[from] StateStoreError),
}

/// Coarse error classification for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown document number.
    NotFound,

    /// Malformed input: missing field, bad quantity, invalid material, empty reason.
    Validation,

    /// Operation illegal from the current document status.
    Conflict,

    /// A receipt batch that would overshoot the ordered quantity.
    Unprocessable,

    /// Store or serialization failure; not expected in normal operation.
    Internal,
}

impl WorkflowError {
    /// Maps the error onto its response class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::NotFound { .. } => ErrorKind::NotFound,
            WorkflowError::InvalidTransition { .. }
            | WorkflowError::ItemAlreadyAssigned { .. }
            | WorkflowError::NothingToConvert { .. } => ErrorKind::Conflict,
            WorkflowError::ReceiptExceedsOrdered { .. } => ErrorKind::Unprocessable,
            WorkflowError::Store(_) => ErrorKind::Internal,
            WorkflowError::NoItems
            | WorkflowError::MissingItemDescription { .. }
            | WorkflowError::InvalidQuantity { .. }
            | WorkflowError::InvalidPrice { .. }
            | WorkflowError::MissingVendor
            | WorkflowError::EmptyRejectionReason { .. }
            | WorkflowError::UnknownMaterial { .. }
            | WorkflowError::MaterialNotActive { .. }
            | WorkflowError::ItemNotFound { .. }
            | WorkflowError::EmptyReceipt { .. }
            | WorkflowError::InvalidReceiptQuantity { .. } => ErrorKind::Validation,
        }
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
