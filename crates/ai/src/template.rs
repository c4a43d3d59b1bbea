use restock_core::UrgencyLevel;

use crate::facts::DecisionFacts;
use crate::rationale::RationaleGenerator;
use crate::result::AiError;

/// Deterministic, model-free rationale.
///
/// Produces an evidence summary in the shape reviewers are used to seeing in
/// approval emails ("HIGH PRIORITY: ... needs reordering (...)").
#[derive(Debug, Default, Copy, Clone)]
pub struct TemplateRationale;

impl TemplateRationale {
    pub fn new() -> Self {
        Self
    }
}

impl RationaleGenerator for TemplateRationale {
    fn name(&self) -> &str {
        "template"
    }

    fn explain(&self, facts: &DecisionFacts) -> Result<String, AiError> {
        if facts.urgency == UrgencyLevel::None {
            return Err(AiError::InvalidInput(format!(
                "no reorder was triggered for SKU {}",
                facts.sku
            )));
        }

        let reason = match facts.days_until_stockout {
            _ if facts.on_hand == 0 => "out of stock".to_string(),
            Some(days) if days <= facts.lead_time_days as f64 => {
                format!("stockout predicted in {days:.1} days, within the {}-day lead time", facts.lead_time_days)
            }
            _ => "below reorder point threshold".to_string(),
        };

        Ok(format!(
            "{urgency} PRIORITY: {sku} needs reordering ({reason}). \
             Current stock: {on_hand} units, daily usage: {daily:.1} units. \
             Recommend ordering {qty} units from {vendor} \
             (EOQ: {eoq}, safety stock: {safety:.1}, cost: ${cost:.2}).",
            urgency = facts.urgency,
            sku = facts.sku,
            on_hand = facts.on_hand,
            daily = facts.daily_demand,
            qty = facts.recommended_quantity,
            vendor = facts.vendor_name,
            eoq = facts.eoq,
            safety = facts.safety_stock,
            cost = facts.estimated_cost,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::{Sku, VendorId};

    fn facts(on_hand: i64, urgency: UrgencyLevel, days: Option<f64>) -> DecisionFacts {
        DecisionFacts {
            sku: Sku::from("WIDGET-001"),
            on_hand,
            reorder_point: 50,
            lead_time_days: 7,
            demand_forecast: 3.0,
            forecast_defaulted: false,
            daily_demand: 3.0,
            annual_demand: 1095.0,
            lead_time_demand: 21.0,
            safety_stock: 21.0,
            eoq: 132,
            recommended_quantity: 132,
            selected_vendor: VendorId::from("V001"),
            vendor_name: "Acme Supplies".to_string(),
            unit_price: 12.5,
            reliability_score: 0.95,
            estimated_cost: 1650.0,
            urgency,
            days_until_stockout: days,
        }
    }

    #[test]
    fn summary_mentions_vendor_quantity_and_cost() {
        let text = TemplateRationale::new()
            .explain(&facts(25, UrgencyLevel::Medium, Some(8.3)))
            .unwrap();
        assert!(text.starts_with("MEDIUM PRIORITY: WIDGET-001 needs reordering (below reorder point threshold)"));
        assert!(text.contains("132 units from Acme Supplies"));
        assert!(text.contains("cost: $1650.00"));
    }

    #[test]
    fn imminent_stockout_is_called_out() {
        let text = TemplateRationale::new()
            .explain(&facts(6, UrgencyLevel::Medium, Some(2.0)))
            .unwrap();
        assert!(text.contains("stockout predicted in 2.0 days"));
    }

    #[test]
    fn zero_stock_reads_as_out_of_stock() {
        let text = TemplateRationale::new()
            .explain(&facts(0, UrgencyLevel::High, Some(0.0)))
            .unwrap();
        assert!(text.starts_with("HIGH PRIORITY"));
        assert!(text.contains("(out of stock)"));
    }

    #[test]
    fn untriggered_decision_is_invalid_input() {
        let err = TemplateRationale::new()
            .explain(&facts(80, UrgencyLevel::None, None))
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }
}
