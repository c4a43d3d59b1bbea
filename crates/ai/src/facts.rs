use serde::{Deserialize, Serialize};

use restock_core::{Sku, UrgencyLevel, VendorId};

/// Numeric facts behind one reorder decision.
///
/// This is what a rationale generator gets to see. It is plain data with no
/// bearing on the decision itself: by the time facts exist, the quantity,
/// vendor and cost are already fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionFacts {
    pub sku: Sku,
    pub on_hand: i64,
    pub reorder_point: i64,
    pub lead_time_days: i64,

    /// Forecast as supplied (units per forecast period).
    pub demand_forecast: f64,
    /// Whether `demand_forecast` came from configuration rather than the item.
    pub forecast_defaulted: bool,
    pub daily_demand: f64,
    pub annual_demand: f64,
    pub lead_time_demand: f64,
    pub safety_stock: f64,
    pub eoq: u64,
    pub recommended_quantity: u64,

    pub selected_vendor: VendorId,
    pub vendor_name: String,
    pub unit_price: f64,
    pub reliability_score: f64,
    pub estimated_cost: f64,
    pub urgency: UrgencyLevel,

    /// `on_hand / daily_demand`; `None` when there is no demand.
    pub days_until_stockout: Option<f64>,
}
