//! Order state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Legal transitions:
/// ```text
/// Draft ──► Submitted ──┬──► Approved ──┬──► PartiallyReceived ──► Received ──► Completed
///   │                   │               │         │    ▲              ▲
///   │                   └──► Rejected   │         └────┘──────────────┘
///   └──► Canceled                       └──► Received / Canceled
/// ```
///
/// Receiving stays in PartiallyReceived until every item is fully received,
/// then moves to Received. Cancel is legal from Draft or Approved only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Being drafted; items can still be changed.
    #[default]
    Draft,

    /// Submitted for approval.
    Submitted,

    /// Approved; goods receipts may be booked.
    Approved,

    /// Rejected by the approver (terminal state).
    Rejected,

    /// Some items received, at least one still open.
    PartiallyReceived,

    /// Every item fully received.
    Received,

    /// Invoiced and closed (terminal state).
    Completed,

    /// Withdrawn before receipt (terminal state).
    Canceled,
}

/// Named state-changing operations on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Submit,
    Approve,
    Reject,
    Cancel,
    /// A goods receipt was booked; `complete` tells whether every item is now
    /// fully received.
    Receive {
        complete: bool,
    },
    Complete,
}

impl OrderStatus {
    /// The legal-transition table: returns the target status for an action
    /// from this status, or `None` when the action is illegal.
    pub fn transition(self, action: OrderAction) -> Option<OrderStatus> {
        use OrderAction as A;
        use OrderStatus as S;

        match (self, action) {
            (S::Draft, A::Submit) => Some(S::Submitted),
            (S::Submitted, A::Approve) => Some(S::Approved),
            (S::Submitted, A::Reject) => Some(S::Rejected),
            (S::Approved | S::PartiallyReceived, A::Receive { complete: false }) => {
                Some(S::PartiallyReceived)
            }
            (S::Approved | S::PartiallyReceived, A::Receive { complete: true }) => {
                Some(S::Received)
            }
            (S::Received, A::Complete) => Some(S::Completed),
            (S::Draft, A::Cancel) | (S::Approved, A::Cancel) => Some(S::Canceled),
            _ => None,
        }
    }

    /// Returns true if items can be modified in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    /// Returns true if goods receipts may be booked in this status.
    pub fn can_receive(&self) -> bool {
        matches!(self, OrderStatus::Approved | OrderStatus::PartiallyReceived)
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected | OrderStatus::Completed | OrderStatus::Canceled
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::Submitted => "Submitted",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::PartiallyReceived => "PartiallyReceived",
            OrderStatus::Received => "Received",
            OrderStatus::Completed => "Completed",
            OrderStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderAction as A;
    use OrderStatus as S;

    #[test]
    fn default_status_is_draft() {
        assert_eq!(OrderStatus::default(), S::Draft);
    }

    #[test]
    fn legal_transitions() {
        assert_eq!(S::Draft.transition(A::Submit), Some(S::Submitted));
        assert_eq!(S::Submitted.transition(A::Approve), Some(S::Approved));
        assert_eq!(S::Submitted.transition(A::Reject), Some(S::Rejected));
        assert_eq!(
            S::Approved.transition(A::Receive { complete: false }),
            Some(S::PartiallyReceived)
        );
        assert_eq!(
            S::Approved.transition(A::Receive { complete: true }),
            Some(S::Received)
        );
        assert_eq!(
            S::PartiallyReceived.transition(A::Receive { complete: false }),
            Some(S::PartiallyReceived)
        );
        assert_eq!(
            S::PartiallyReceived.transition(A::Receive { complete: true }),
            Some(S::Received)
        );
        assert_eq!(S::Received.transition(A::Complete), Some(S::Completed));
        assert_eq!(S::Draft.transition(A::Cancel), Some(S::Canceled));
        assert_eq!(S::Approved.transition(A::Cancel), Some(S::Canceled));
    }

    #[test]
    fn illegal_transitions() {
        assert_eq!(S::Draft.transition(A::Receive { complete: false }), None);
        assert_eq!(S::Submitted.transition(A::Cancel), None);
        assert_eq!(S::PartiallyReceived.transition(A::Cancel), None);
        assert_eq!(S::PartiallyReceived.transition(A::Complete), None);
        assert_eq!(S::Approved.transition(A::Complete), None);
        assert_eq!(S::Received.transition(A::Receive { complete: true }), None);
    }

    #[test]
    fn terminal_states_accept_no_action() {
        for terminal in [S::Rejected, S::Completed, S::Canceled] {
            assert!(terminal.is_terminal());
            for action in [
                A::Submit,
                A::Approve,
                A::Reject,
                A::Cancel,
                A::Receive { complete: false },
                A::Receive { complete: true },
                A::Complete,
            ] {
                assert_eq!(terminal.transition(action), None);
            }
        }
    }

    #[test]
    fn receive_predicate() {
        assert!(S::Approved.can_receive());
        assert!(S::PartiallyReceived.can_receive());
        assert!(!S::Draft.can_receive());
        assert!(!S::Received.can_receive());
        assert!(!S::Completed.can_receive());
    }

    #[test]
    fn serialization_roundtrip() {
        let status = S::PartiallyReceived;
        let json = serde_json::to_string(&status).unwrap();
        let deserialized: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, deserialized);
    }
}
