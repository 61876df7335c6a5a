//! Human-readable status texts for customer notifications

use shared::OrderStatus;

/// Static status -> text table. Statuses a customer is never notified
/// about (like draft) are deliberately absent and fall back to the
/// generic template.
const STATUS_MESSAGES: &[(&str, &str)] = &[
    ("PAYMENT_UPLOADED", "Payment receipt received, waiting for review"),
    ("CASH_SELECTED", "Order placed, please pay at the counter"),
    (
        "DISAPPROVED",
        "Payment could not be verified, please upload a new receipt",
    ),
    ("APPROVED", "Payment confirmed, your order is in the queue"),
    ("PREPARING", "The kitchen is preparing your order"),
    ("READY", "Your order is ready for pickup"),
    ("RECEIVED", "Order complete, enjoy!"),
    ("CANCELLED", "Your order has been cancelled"),
];

/// Text for a status change notification. Falls back to a generic
/// template for statuses without a table entry; never fails.
pub fn status_message(status: OrderStatus) -> String {
    STATUS_MESSAGES
        .iter()
        .find(|(key, _)| *key == status.as_str())
        .map(|(_, text)| (*text).to_string())
        .unwrap_or_else(|| format!("Your order status changed to {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_have_specific_text() {
        assert_eq!(
            status_message(OrderStatus::Ready),
            "Your order is ready for pickup"
        );
        assert_eq!(
            status_message(OrderStatus::Preparing),
            "The kitchen is preparing your order"
        );
    }

    #[test]
    fn test_unlisted_status_uses_generic_template() {
        assert_eq!(
            status_message(OrderStatus::Draft),
            "Your order status changed to DRAFT"
        );
    }
}
