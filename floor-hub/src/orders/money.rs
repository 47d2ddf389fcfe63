//! Money calculation using rust_decimal
//!
//! Wire values are `f64`. Arithmetic happens in `Decimal` and is rounded to
//! two decimal places (half away from zero) on the way back out.

use rust_decimal::prelude::*;
use shared::error::{AppError, AppResult};
use shared::models::OrderItem;

const DECIMAL_PLACES: u32 = 2;

/// Maximum unit price accepted from a terminal
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum quantity per line
pub const MAX_QUANTITY: u32 = 9999;
/// Maximum explicit order total
pub const MAX_TOTAL: f64 = 1_000_000_000.0;

#[inline]
fn require_finite(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::invalid_payload(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_amount(value: f64, field: &str) -> AppResult<()> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(AppError::invalid_payload(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::invalid_payload(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field, MAX_PRICE, value
        )));
    }
    Ok(())
}

/// Validate an item before it reaches the ledger
///
/// Unpriced items are accepted and contribute nothing to totals.
pub fn validate_item(item: &OrderItem) -> AppResult<()> {
    if let Some(price) = item.price {
        validate_amount(price, "price")?;
    }
    if let Some(quantity) = item.quantity
        && quantity > MAX_QUANTITY
    {
        return Err(AppError::invalid_payload(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Validate an explicit order total
pub fn validate_total(total: f64) -> AppResult<()> {
    require_finite(total, "total")?;
    if total < 0.0 {
        return Err(AppError::invalid_payload(format!(
            "total must be non-negative, got {}",
            total
        )));
    }
    if total > MAX_TOTAL {
        return Err(AppError::invalid_payload(format!(
            "total exceeds maximum allowed ({}), got {}",
            MAX_TOTAL, total
        )));
    }
    Ok(())
}

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to cents and convert back for the wire
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `price × max(quantity, 1)`, `None` for unpriced items
pub fn line_total(item: &OrderItem) -> Option<Decimal> {
    item.price
        .map(|price| to_decimal(price) * Decimal::from(item.effective_quantity()))
}

/// Sum of all priced lines
pub fn items_total(items: &[OrderItem]) -> f64 {
    let sum: Decimal = items.iter().filter_map(line_total).sum();
    to_f64(sum)
}

/// `total + line_total(item)`; unpriced items leave the total unchanged
pub fn add_line(total: f64, item: &OrderItem) -> f64 {
    match line_total(item) {
        Some(line) => to_f64(to_decimal(total) + line),
        None => total,
    }
}
