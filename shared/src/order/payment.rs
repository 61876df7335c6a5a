//! Payment details and order totals

use serde::{Deserialize, Serialize};

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Bank-transfer receipt uploaded by the customer
    Receipt,
    /// Cash at the counter
    Cash,
}

/// Payment state for an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    /// Reference to the uploaded receipt image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_image: Option<String>,
    /// Amount the customer reports having paid
    #[serde(default)]
    pub paid_amount: f64,
    /// Staff note explaining a disapproval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_note: Option<String>,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            receipt_image: None,
            paid_amount: 0.0,
            rejection_note: None,
        }
    }
}

/// Order totals. `total = subtotal + tax`, all non-negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Pricing {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}
