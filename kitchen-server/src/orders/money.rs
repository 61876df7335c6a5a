//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use crate::orders::lifecycle::OrderError;
use rust_decimal::prelude::*;
use shared::{OrderItem, Pricing};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate one order line before pricing
pub fn validate_item(item: &OrderItem) -> Result<(), OrderError> {
    require_finite(item.unit_price, "unit_price")?;
    if item.unit_price < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "unit_price must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.unit_price
        )));
    }

    if item.quantity <= 0 {
        return Err(OrderError::InvalidOperation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    Ok(())
}

/// Convert f64 to Decimal for precise arithmetic
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Compute subtotal, tax and total for an order's lines.
///
/// `tax_rate` is a fraction (0.21 for 21%). The unit price on each line is
/// already the price for the chosen portion, so the subtotal is a plain
/// quantity * price sum.
pub fn compute_pricing(items: &[OrderItem], tax_rate: f64) -> Result<Pricing, OrderError> {
    require_finite(tax_rate, "tax_rate")?;
    if !(0.0..=1.0).contains(&tax_rate) {
        return Err(OrderError::InvalidOperation(format!(
            "tax_rate must be between 0 and 1, got {}",
            tax_rate
        )));
    }

    let mut subtotal = Decimal::ZERO;
    for item in items {
        validate_item(item)?;
        subtotal += to_decimal(item.unit_price) * Decimal::from(item.quantity);
    }

    let tax = (subtotal * to_decimal(tax_rate))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal + tax;

    Ok(Pricing {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    })
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}
