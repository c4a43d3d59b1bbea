use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult};

/// Days per year used to annualize a forecast.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Parameters of the reorder policy.
///
/// Passed explicitly into every evaluation; there is no process-wide policy
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Fixed cost of placing one order.
    pub ordering_cost: f64,
    /// Annual holding cost as a fraction of unit cost.
    pub holding_cost_rate: f64,
    /// Multiplier applied to expected demand during lead time.
    pub safety_stock_multiplier: f64,
    /// Length, in days, of the period `demand_forecast` is expressed in.
    pub forecast_period_days: f64,
    /// Forecast to use for items that do not carry one.
    pub default_demand_forecast: Option<f64>,
    /// Floor for the recommended quantity once a reorder is triggered.
    pub min_order_quantity: u64,
    pub urgency: UrgencyThresholds,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            ordering_cost: 50.0,
            holding_cost_rate: 0.25,
            safety_stock_multiplier: 1.0,
            forecast_period_days: 1.0,
            default_demand_forecast: None,
            min_order_quantity: 0,
            urgency: UrgencyThresholds::default(),
        }
    }
}

/// Boundaries between urgency levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyThresholds {
    /// `HIGH` when on-hand stock is at or below this many units.
    pub high_at_or_below: i64,
    /// `MEDIUM` when on-hand stock is strictly below this fraction of the
    /// reorder point.
    pub medium_fraction: f64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            high_at_or_below: 0,
            medium_fraction: 0.5,
        }
    }
}

impl ReorderConfig {
    pub fn with_ordering_cost(mut self, ordering_cost: f64) -> Self {
        self.ordering_cost = ordering_cost;
        self
    }

    pub fn with_holding_cost_rate(mut self, rate: f64) -> Self {
        self.holding_cost_rate = rate;
        self
    }

    pub fn with_safety_stock_multiplier(mut self, multiplier: f64) -> Self {
        self.safety_stock_multiplier = multiplier;
        self
    }

    pub fn with_forecast_period_days(mut self, days: f64) -> Self {
        self.forecast_period_days = days;
        self
    }

    pub fn with_default_demand_forecast(mut self, forecast: f64) -> Self {
        self.default_demand_forecast = Some(forecast);
        self
    }

    pub fn with_min_order_quantity(mut self, quantity: u64) -> Self {
        self.min_order_quantity = quantity;
        self
    }

    pub fn with_urgency(mut self, urgency: UrgencyThresholds) -> Self {
        self.urgency = urgency;
        self
    }

    /// Reject parameter combinations that would make the EOQ formula
    /// meaningless. All failures are configuration errors.
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.ordering_cost.is_finite() && self.ordering_cost > 0.0) {
            return Err(DomainError::configuration(format!(
                "ordering_cost must be a finite positive number (got {})",
                self.ordering_cost
            )));
        }
        if !(self.holding_cost_rate.is_finite() && self.holding_cost_rate > 0.0) {
            return Err(DomainError::configuration(format!(
                "holding_cost_rate must be a finite positive number (got {})",
                self.holding_cost_rate
            )));
        }
        if !(self.safety_stock_multiplier.is_finite() && self.safety_stock_multiplier >= 0.0) {
            return Err(DomainError::configuration(format!(
                "safety_stock_multiplier must be a finite non-negative number (got {})",
                self.safety_stock_multiplier
            )));
        }
        if !(self.forecast_period_days.is_finite() && self.forecast_period_days > 0.0) {
            return Err(DomainError::configuration(format!(
                "forecast_period_days must be a finite positive number (got {})",
                self.forecast_period_days
            )));
        }
        if let Some(f) = self.default_demand_forecast {
            if !(f.is_finite() && f >= 0.0) {
                return Err(DomainError::configuration(format!(
                    "default_demand_forecast must be a finite non-negative number (got {f})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.urgency.medium_fraction) {
            return Err(DomainError::configuration(format!(
                "urgency.medium_fraction must be within [0, 1] (got {})",
                self.urgency.medium_fraction
            )));
        }
        if self.urgency.high_at_or_below < 0 {
            return Err(DomainError::configuration(
                "urgency.high_at_or_below cannot be negative",
            ));
        }
        Ok(())
    }
}
