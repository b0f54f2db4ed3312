//! Requisition state machine.

use serde::{Deserialize, Serialize};

/// The status of a requisition in its lifecycle.
///
/// Legal transitions:
/// ```text
/// Draft ──► Submitted ──┬──► Approved ──┬──► Ordered
///   │                   │               │
///   │                   └──► Rejected   └──► Canceled
///   └──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequisitionStatus {
    /// Being drafted; items can still be changed.
    #[default]
    Draft,

    /// Submitted for approval.
    Submitted,

    /// Approved; may be converted into an order or canceled.
    Approved,

    /// Rejected by the approver (terminal state).
    Rejected,

    /// All items assigned to an order (terminal state).
    Ordered,

    /// Withdrawn before ordering (terminal state).
    Canceled,
}

/// Named state-changing operations on a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionAction {
    Submit,
    Approve,
    Reject,
    Cancel,
    MarkOrdered,
}

impl RequisitionStatus {
    /// The legal-transition table: returns the target status for an action
    /// from this status, or `None` when the action is illegal.
    pub fn transition(self, action: RequisitionAction) -> Option<RequisitionStatus> {
        use RequisitionAction as A;
        use RequisitionStatus as S;

        match (self, action) {
            (S::Draft, A::Submit) => Some(S::Submitted),
            (S::Submitted, A::Approve) => Some(S::Approved),
            (S::Submitted, A::Reject) => Some(S::Rejected),
            (S::Approved, A::MarkOrdered) => Some(S::Ordered),
            (S::Draft, A::Cancel) | (S::Approved, A::Cancel) => Some(S::Canceled),
            _ => None,
        }
    }

    /// Returns true if items can be modified in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, RequisitionStatus::Draft)
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequisitionStatus::Rejected | RequisitionStatus::Ordered | RequisitionStatus::Canceled
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequisitionStatus::Draft => "Draft",
            RequisitionStatus::Submitted => "Submitted",
            RequisitionStatus::Approved => "Approved",
            RequisitionStatus::Rejected => "Rejected",
            RequisitionStatus::Ordered => "Ordered",
            RequisitionStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of one requisition item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    /// Not yet assigned to an order.
    #[default]
    Open,

    /// Assigned to an order; the item carries the order back-reference.
    Assigned,

    /// Canceled together with the requisition.
    Canceled,
}

impl ItemStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Open => "Open",
            ItemStatus::Assigned => "Assigned",
            ItemStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
