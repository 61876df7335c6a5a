//! Order status graph
//!
//! Every order moves along this graph and no other path:
//!
//! ```text
//! draft            -> payment_uploaded | cash_selected | cancelled
//! payment_uploaded -> approved | disapproved | cancelled
//! cash_selected    -> approved | disapproved | cancelled
//! disapproved      -> payment_uploaded | cancelled
//! approved         -> preparing | cancelled
//! preparing        -> ready | cancelled
//! ready            -> received
//! received         -> (terminal)
//! cancelled        -> (terminal)
//! ```
//!
//! The table lives here so server and clients agree on which actions are
//! offered for an order in a given state. The server owns the apply step
//! (status write + audit entry); this module only answers legality.

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Checkout submitted, payment step not chosen yet
    #[default]
    Draft,
    /// Customer uploaded a transfer receipt, awaiting staff review
    PaymentUploaded,
    /// Customer will pay cash at the counter, awaiting staff review
    CashSelected,
    /// Staff rejected the payment; customer may re-upload
    Disapproved,
    /// Staff accepted the order; about to enter the kitchen queue
    Approved,
    /// In the kitchen queue
    Preparing,
    /// Prepared, waiting to be picked up
    Ready,
    /// Picked up by the customer
    Received,
    /// Cancelled by either side
    Cancelled,
}

impl OrderStatus {
    /// Legal targets from this status. Empty for terminal states.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Draft => &[PaymentUploaded, CashSelected, Cancelled],
            PaymentUploaded => &[Approved, Disapproved, Cancelled],
            CashSelected => &[Approved, Disapproved, Cancelled],
            Disapproved => &[PaymentUploaded, Cancelled],
            Approved => &[Preparing, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Received],
            Received => &[],
            Cancelled => &[],
        }
    }

    /// Check whether `next` is a legal successor of this status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Statuses that occupy a kitchen queue slot.
    pub fn is_queued(self) -> bool {
        matches!(self, OrderStatus::Approved | OrderStatus::Preparing)
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::PaymentUploaded => "PAYMENT_UPLOADED",
            OrderStatus::CashSelected => "CASH_SELECTED",
            OrderStatus::Disapproved => "DISAPPROVED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a status change against the legal graph. No entry means invalid.
pub fn is_valid_transition(current: OrderStatus, next: OrderStatus) -> bool {
    current.can_transition_to(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_full_transition_table() {
        let legal: &[(OrderStatus, &[OrderStatus])] = &[
            (Draft, &[PaymentUploaded, CashSelected, Cancelled]),
            (PaymentUploaded, &[Approved, Disapproved, Cancelled]),
            (CashSelected, &[Approved, Disapproved, Cancelled]),
            (Disapproved, &[PaymentUploaded, Cancelled]),
            (Approved, &[Preparing, Cancelled]),
            (Preparing, &[Ready, Cancelled]),
            (Ready, &[Received]),
            (Received, &[]),
            (Cancelled, &[]),
        ];

        let all = [
            Draft,
            PaymentUploaded,
            CashSelected,
            Disapproved,
            Approved,
            Preparing,
            Ready,
            Received,
            Cancelled,
        ];

        for &(from, allowed) in legal {
            for to in all {
                assert_eq!(
                    is_valid_transition(from, to),
                    allowed.contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_draft_cannot_skip_to_preparing() {
        assert!(!is_valid_transition(Draft, Preparing));
        assert!(!is_valid_transition(Draft, Approved));
        assert!(!is_valid_transition(Draft, Ready));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        assert!(Received.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Ready.is_terminal());
        assert!(!is_valid_transition(Received, Cancelled));
        assert!(!is_valid_transition(Cancelled, Draft));
    }

    #[test]
    fn test_ready_cannot_be_cancelled() {
        // Once prepared, the order must be handed over.
        assert!(!is_valid_transition(Ready, Cancelled));
        assert!(is_valid_transition(Ready, Received));
    }

    #[test]
    fn test_disapproved_allows_reupload() {
        assert!(is_valid_transition(Disapproved, PaymentUploaded));
        assert!(!is_valid_transition(Disapproved, Approved));
    }

    #[test]
    fn test_queued_statuses() {
        assert!(Approved.is_queued());
        assert!(Preparing.is_queued());
        assert!(!Ready.is_queued());
        assert!(!Draft.is_queued());
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&PaymentUploaded).unwrap();
        assert_eq!(json, "\"PAYMENT_UPLOADED\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PaymentUploaded);
        assert_eq!(PaymentUploaded.as_str(), "PAYMENT_UPLOADED");
    }
}
