//! Closed-form replenishment quantities.

use restock_core::{DomainError, DomainResult};

/// Economic Order Quantity: `round(sqrt(2·D·S / H))`.
///
/// - `annual_demand` (D): units per year, ≥ 0
/// - `ordering_cost` (S): cost per order, ≥ 0
/// - `holding_cost` (H): cost to hold one unit for a year, must be > 0
pub fn economic_order_quantity(
    annual_demand: f64,
    ordering_cost: f64,
    holding_cost: f64,
) -> DomainResult<u64> {
    if !(holding_cost.is_finite() && holding_cost > 0.0) {
        return Err(DomainError::configuration(format!(
            "holding cost must be positive (got {holding_cost})"
        )));
    }
    if !(ordering_cost.is_finite() && ordering_cost >= 0.0) {
        return Err(DomainError::configuration(format!(
            "ordering cost cannot be negative (got {ordering_cost})"
        )));
    }
    if !(annual_demand.is_finite() && annual_demand >= 0.0) {
        return Err(DomainError::validation(format!(
            "annual demand must be a finite non-negative number (got {annual_demand})"
        )));
    }

    let eoq = (2.0 * annual_demand * ordering_cost / holding_cost).sqrt();
    Ok(eoq.round() as u64)
}

/// Expected demand during the lead time, times the safety multiplier.
pub fn safety_stock(daily_demand: f64, lead_time_days: i64, multiplier: f64) -> f64 {
    (daily_demand * lead_time_days.max(0) as f64 * multiplier).max(0.0)
}
