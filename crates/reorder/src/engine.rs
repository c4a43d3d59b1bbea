//! Reorder decision: trigger check, sizing, vendor choice, urgency.

use std::sync::Arc;

use tracing::{debug, warn};

use restock_ai::{DecisionFacts, RationaleGenerator};
use restock_core::{DomainError, DomainResult};
use restock_inventory::{InventoryItem, VendorOffer};

use crate::config::{DAYS_PER_YEAR, ReorderConfig};
use crate::eoq::{economic_order_quantity, safety_stock};
use crate::plan::{RationaleSource, ReorderPlan};
use crate::urgency::classify;
use crate::vendor::select_vendor;

/// Evaluate one item against its vendor offers.
///
/// Returns `Ok(None)` when stock is above the reorder point. Failures are
/// scoped to this item: callers report the SKU and move on.
///
/// The optional `rationale` generator only replaces the explanation text; if
/// it fails or returns blank output the deterministic explanation is kept.
pub fn evaluate(
    item: &InventoryItem,
    offers: &[VendorOffer],
    config: &ReorderConfig,
    rationale: Option<&dyn RationaleGenerator>,
) -> DomainResult<Option<ReorderPlan>> {
    item.validate()?;

    if !item.is_at_or_below_reorder_point() {
        debug!(sku = %item.sku, on_hand = item.on_hand, reorder_point = item.reorder_point, "above reorder point");
        return Ok(None);
    }

    config.validate()?;

    let offer = select_vendor(item, offers)?;

    let (demand_forecast, forecast_defaulted) =
        match (item.demand_forecast, config.default_demand_forecast) {
            (Some(f), _) => (f, false),
            (None, Some(f)) => (f, true),
            (None, None) => {
                return Err(DomainError::validation(format!(
                    "missing demand forecast for SKU {} and no default configured",
                    item.sku
                )));
            }
        };

    let daily_demand = demand_forecast / config.forecast_period_days;
    let annual_demand = daily_demand * DAYS_PER_YEAR;
    let lead_time_demand = daily_demand * item.lead_time_days as f64;
    let safety = safety_stock(daily_demand, item.lead_time_days, config.safety_stock_multiplier);

    let holding_cost = config.holding_cost_rate * item.unit_cost;
    let eoq = economic_order_quantity(annual_demand, config.ordering_cost, holding_cost)
        .map_err(|e| match e {
            DomainError::Configuration(msg) => {
                DomainError::configuration(format!("{msg} for SKU {}", item.sku))
            }
            other => other,
        })?;

    let recommended_quantity = (eoq as f64)
        .max(safety)
        .max(config.min_order_quantity as f64)
        .round()
        .max(0.0) as u64;

    let urgency = classify(item.on_hand, item.reorder_point, &config.urgency);
    let estimated_cost = recommended_quantity as f64 * offer.price;
    let days_until_stockout = (daily_demand > 0.0).then(|| item.on_hand as f64 / daily_demand);

    let facts = DecisionFacts {
        sku: item.sku.clone(),
        on_hand: item.on_hand,
        reorder_point: item.reorder_point,
        lead_time_days: item.lead_time_days,
        demand_forecast,
        forecast_defaulted,
        daily_demand,
        annual_demand,
        lead_time_demand,
        safety_stock: safety,
        eoq,
        recommended_quantity,
        selected_vendor: offer.vendor_id.clone(),
        vendor_name: offer.display_name().to_string(),
        unit_price: offer.price,
        reliability_score: offer.reliability_score,
        estimated_cost,
        urgency,
        days_until_stockout,
    };

    let (text, source) = match rationale.and_then(|g| generated_rationale(g, &facts)) {
        Some(text) => (text, RationaleSource::Generated),
        None => (fallback_rationale(&facts), RationaleSource::Fallback),
    };

    debug!(
        sku = %item.sku,
        vendor = %offer.vendor_id,
        eoq,
        recommended_quantity,
        estimated_cost,
        urgency = %urgency,
        "reorder triggered"
    );

    Ok(Some(ReorderPlan {
        sku: item.sku.clone(),
        recommended_quantity,
        selected_vendor: Some(offer.vendor_id.clone()),
        estimated_cost,
        urgency_level: urgency,
        rationale: text,
        rationale_source: source,
        facts,
    }))
}

fn generated_rationale(generator: &dyn RationaleGenerator, facts: &DecisionFacts) -> Option<String> {
    match generator.explain(facts) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!(sku = %facts.sku, generator = generator.name(), "rationale generator returned blank text; using fallback");
            None
        }
        Err(e) => {
            warn!(sku = %facts.sku, generator = generator.name(), error = %e, "rationale generation failed; using fallback");
            None
        }
    }
}

/// Deterministic explanation of the numbers in `facts`.
pub fn fallback_rationale(facts: &DecisionFacts) -> String {
    format!(
        "on_hand {} ≤ reorder_point {}; EOQ={}; safety_stock={:.2}; recommended_quantity={}; \
         selected vendor {} at price {:.2} due to lowest cost",
        facts.on_hand,
        facts.reorder_point,
        facts.eoq,
        facts.safety_stock,
        facts.recommended_quantity,
        facts.selected_vendor,
        facts.unit_price,
    )
}

/// A configured, shareable evaluator.
///
/// Holds validated configuration and an optional rationale generator. Cheap to
/// clone and safe to use from many threads at once.
#[derive(Clone)]
pub struct ReorderEngine {
    config: ReorderConfig,
    rationale: Option<Arc<dyn RationaleGenerator>>,
}

impl core::fmt::Debug for ReorderEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReorderEngine")
            .field("config", &self.config)
            .field("rationale", &self.rationale.as_ref().map(|g| g.name()))
            .finish()
    }
}

impl ReorderEngine {
    /// Rejects invalid configuration up front.
    pub fn new(config: ReorderConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rationale: None,
        })
    }

    pub fn with_rationale(mut self, generator: Arc<dyn RationaleGenerator>) -> Self {
        self.rationale = Some(generator);
        self
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        item: &InventoryItem,
        offers: &[VendorOffer],
    ) -> DomainResult<Option<ReorderPlan>> {
        evaluate(item, offers, &self.config, self.rationale.as_deref())
    }
}
