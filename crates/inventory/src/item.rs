use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult, Sku, VendorId};

/// Read-only snapshot of one inventory row, fetched once per evaluation cycle.
///
/// Counts are signed so that malformed upstream rows (e.g. a negative on-hand
/// value typed into a sheet) survive deserialization and can be rejected by
/// [`InventoryItem::validate`] with a proper validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: Sku,
    pub on_hand: i64,
    pub reorder_point: i64,
    pub lead_time_days: i64,
    /// Vendors allowed to supply this SKU, in order of preference.
    pub vendor_ids: Vec<VendorId>,
    pub unit_cost: f64,
    /// Units per forecast period; absent until a forecast stage fills it in.
    #[serde(default)]
    pub demand_forecast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn new(sku: impl Into<Sku>, on_hand: i64, reorder_point: i64) -> Self {
        Self {
            sku: sku.into(),
            on_hand,
            reorder_point,
            lead_time_days: 0,
            vendor_ids: Vec::new(),
            unit_cost: 0.0,
            demand_forecast: None,
            description: None,
        }
    }

    pub fn with_lead_time_days(mut self, days: i64) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_vendor(mut self, vendor_id: impl Into<VendorId>) -> Self {
        self.vendor_ids.push(vendor_id.into());
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_demand_forecast(mut self, forecast: f64) -> Self {
        self.demand_forecast = Some(forecast);
        self
    }

    /// Whether stock has fallen to (or below) the reorder point.
    pub fn is_at_or_below_reorder_point(&self) -> bool {
        self.on_hand <= self.reorder_point
    }

    /// Check the non-negativity invariants of the snapshot.
    ///
    /// An empty `vendor_ids` list is not a validation failure here; it only
    /// matters once a reorder is actually triggered.
    pub fn validate(&self) -> DomainResult<()> {
        let sku = &self.sku;
        if self.sku.as_str().trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if self.on_hand < 0 {
            return Err(DomainError::validation(format!(
                "on_hand cannot be negative for SKU {sku} (got {})",
                self.on_hand
            )));
        }
        if self.reorder_point < 0 {
            return Err(DomainError::validation(format!(
                "reorder_point cannot be negative for SKU {sku} (got {})",
                self.reorder_point
            )));
        }
        if self.lead_time_days < 0 {
            return Err(DomainError::validation(format!(
                "lead_time_days cannot be negative for SKU {sku} (got {})",
                self.lead_time_days
            )));
        }
        if !(self.unit_cost.is_finite() && self.unit_cost >= 0.0) {
            return Err(DomainError::validation(format!(
                "unit_cost must be a finite non-negative number for SKU {sku}"
            )));
        }
        if let Some(f) = self.demand_forecast {
            if !(f.is_finite() && f >= 0.0) {
                return Err(DomainError::validation(format!(
                    "demand_forecast must be a finite non-negative number for SKU {sku}"
                )));
            }
        }
        Ok(())
    }
}
