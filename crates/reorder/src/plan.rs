use serde::{Deserialize, Serialize};

use restock_ai::DecisionFacts;
use restock_core::{Sku, UrgencyLevel, VendorId};

/// Where a plan's rationale text came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleSource {
    /// Written by an injected rationale generator.
    Generated,
    /// Deterministic explanation built by the engine itself.
    Fallback,
}

/// Output of one evaluation.
///
/// Created fresh per cycle and never mutated afterwards; a later cycle
/// supersedes it with a new plan for the same SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub sku: Sku,
    pub recommended_quantity: u64,
    pub selected_vendor: Option<VendorId>,
    pub estimated_cost: f64,
    pub urgency_level: UrgencyLevel,
    pub rationale: String,
    pub rationale_source: RationaleSource,
    pub facts: DecisionFacts,
}

impl ReorderPlan {
    /// Whether the plan actually asks for stock.
    pub fn orders_stock(&self) -> bool {
        self.recommended_quantity > 0 && self.selected_vendor.is_some()
    }
}
