//! Procure-to-pay workflow engine.
//!
//! This crate owns the document lifecycle of the simulated procure-to-pay
//! process:
//! - [`requisition`]: the requisition state machine and item validation
//! - [`order`]: the order state machine, requisition conversion, and goods
//!   receipt tracking
//! - [`reconcile`]: pure aggregate computations shared by both document kinds
//! - [`facade`]: the single entry point composing the managers over a
//!   [`state_store::StateStore`]
//!
//! All mutation goes through state-machine-checked transitions; failures are
//! typed [`WorkflowError`] values, never panics, and never reach the store.

pub mod commands;
pub mod error;
pub mod facade;
pub mod material;
pub mod order;
pub mod reconcile;
pub mod requisition;
pub mod types;

pub use commands::{ItemFields, OrderFields, ReceiptLine, RequisitionFields};
pub use error::{ErrorKind, Result, WorkflowError};
pub use facade::Workflow;
pub use material::{InMemoryMaterialDirectory, MaterialDirectory, MaterialInfo, MaterialStatus};
pub use order::{Order, OrderItem, OrderManager, OrderStatus};
pub use reconcile::{ItemReceipt, ReceiptCompleteness};
pub use requisition::{
    ItemStatus, Requisition, RequisitionItem, RequisitionManager, RequisitionStatus,
};
pub use types::ProcurementType;
