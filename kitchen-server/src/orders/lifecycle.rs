//! Status transition enforcement
//!
//! Every status mutation flows through [`apply_transition`], which checks
//! the transition table and appends the audit entry in the same step. A
//! rejected transition leaves the order untouched.

use crate::orders::store::StorageError;
use shared::order::{Actor, AuditEntry, Order, OrderStatus};
use shared::util;
use thiserror::Error;

/// Errors produced by order operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested status change is not in the transition table
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// No order with this id exists
    #[error("order not found: {0}")]
    NotFound(String),

    /// Input failed validation
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The persistence layer failed
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Apply a status transition to an in-memory order.
///
/// On success the status and `updated_at` are set and one audit entry is
/// appended, so a following save persists both together. On rejection the
/// order is left exactly as it was and no audit entry is recorded.
pub fn apply_transition(
    order: &mut Order,
    next: OrderStatus,
    actor: &Actor,
    note: Option<String>,
) -> OrderResult<()> {
    if !order.status.can_transition_to(next) {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: next,
        });
    }

    let now = util::now_millis();
    order.audit_logs.push(AuditEntry {
        previous_status: order.status,
        new_status: next,
        actor_id: actor.id.clone(),
        actor_role: actor.role,
        note,
        timestamp: now,
    });
    order.status = next;
    order.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{PaymentMethod, Pricing};

    fn draft_order() -> Order {
        Order::new(
            "tenant-1",
            "#0001",
            "cust-1",
            vec![],
            PaymentMethod::Cash,
            Pricing::default(),
        )
    }

    #[test]
    fn test_valid_transition_appends_audit_entry() {
        let mut order = draft_order();
        let actor = Actor::customer("cust-1");

        apply_transition(&mut order, OrderStatus::CashSelected, &actor, None).unwrap();

        assert_eq!(order.status, OrderStatus::CashSelected);
        assert_eq!(order.audit_logs.len(), 1);
        let entry = &order.audit_logs[0];
        assert_eq!(entry.previous_status, OrderStatus::Draft);
        assert_eq!(entry.new_status, OrderStatus::CashSelected);
        assert_eq!(entry.actor_id, "cust-1");
        assert_eq!(order.updated_at, entry.timestamp);
    }

    #[test]
    fn test_rejected_transition_leaves_order_untouched() {
        let mut order = draft_order();
        let before = order.clone();
        let actor = Actor::staff("staff-1");

        let err = apply_transition(&mut order, OrderStatus::Preparing, &actor, None).unwrap_err();

        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Draft,
                to: OrderStatus::Preparing,
            }
        ));
        assert_eq!(order, before);
        assert!(order.audit_logs.is_empty());
    }

    #[test]
    fn test_note_is_recorded() {
        let mut order = draft_order();
        apply_transition(
            &mut order,
            OrderStatus::PaymentUploaded,
            &Actor::customer("cust-1"),
            None,
        )
        .unwrap();
        apply_transition(
            &mut order,
            OrderStatus::Disapproved,
            &Actor::staff("staff-1"),
            Some("receipt unreadable".to_string()),
        )
        .unwrap();

        assert_eq!(order.audit_logs.len(), 2);
        assert_eq!(
            order.audit_logs[1].note.as_deref(),
            Some("receipt unreadable")
        );
    }

    #[test]
    fn test_history_grows_one_entry_per_change() {
        let mut order = draft_order();
        let customer = Actor::customer("cust-1");
        let staff = Actor::staff("staff-1");

        apply_transition(&mut order, OrderStatus::PaymentUploaded, &customer, None).unwrap();
        apply_transition(&mut order, OrderStatus::Approved, &staff, None).unwrap();
        apply_transition(&mut order, OrderStatus::Preparing, &staff, None).unwrap();
        apply_transition(&mut order, OrderStatus::Ready, &staff, None).unwrap();
        apply_transition(&mut order, OrderStatus::Received, &customer, None).unwrap();

        assert_eq!(order.audit_logs.len(), 5);
        // Entries chain: each previous_status matches the prior new_status
        for pair in order.audit_logs.windows(2) {
            assert_eq!(pair[0].new_status, pair[1].previous_status);
        }
        assert!(order.status.is_terminal());
    }
}
