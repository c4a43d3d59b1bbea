use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult, VendorId};

/// A vendor's current terms for supplying one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOffer {
    pub vendor_id: VendorId,
    pub price: f64,
    pub lead_time_days: i64,
    /// Delivery track record in \[0, 1\].
    pub reliability_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
}

impl VendorOffer {
    pub fn new(vendor_id: impl Into<VendorId>, price: f64, reliability_score: f64) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            price,
            lead_time_days: 0,
            reliability_score,
            vendor_name: None,
        }
    }

    pub fn with_lead_time_days(mut self, days: i64) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_vendor_name(mut self, name: impl Into<String>) -> Self {
        self.vendor_name = Some(name.into());
        self
    }

    /// Name to show humans; falls back to the vendor id.
    pub fn display_name(&self) -> &str {
        self.vendor_name
            .as_deref()
            .unwrap_or_else(|| self.vendor_id.as_str())
    }

    pub fn validate(&self) -> DomainResult<()> {
        let vendor = &self.vendor_id;
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(DomainError::validation(format!(
                "price must be a finite non-negative number for vendor {vendor}"
            )));
        }
        if self.lead_time_days < 0 {
            return Err(DomainError::validation(format!(
                "lead_time_days cannot be negative for vendor {vendor} (got {})",
                self.lead_time_days
            )));
        }
        if !(0.0..=1.0).contains(&self.reliability_score) {
            return Err(DomainError::validation(format!(
                "reliability_score must be within [0, 1] for vendor {vendor} (got {})",
                self.reliability_score
            )));
        }
        Ok(())
    }
}
