//! Auto-approval vs. human approval routing for reorder plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::{CycleId, Sku, UrgencyLevel, VendorId};
use restock_reorder::ReorderPlan;

use crate::sinks::TaskRef;

/// Thresholds deciding which plans may skip human approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalPolicy {
    /// Plans costing this much or more need approval.
    pub auto_order_threshold: f64,
    /// Minimum vendor reliability for auto-approval.
    pub vendor_trust_threshold: f64,
    /// Never auto-approve.
    pub dry_run: bool,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            auto_order_threshold: 500.0,
            vendor_trust_threshold: 0.8,
            dry_run: false,
        }
    }
}

/// What happens to a plan after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    AutoApprove,
    RequiresApproval { reason: String },
}

impl Disposition {
    pub fn is_auto(&self) -> bool {
        matches!(self, Disposition::AutoApprove)
    }
}

/// Route a plan according to `policy`.
pub fn route(plan: &ReorderPlan, policy: &ApprovalPolicy) -> Disposition {
    if policy.dry_run {
        return Disposition::RequiresApproval {
            reason: "dry_run".to_string(),
        };
    }
    if !plan.orders_stock() {
        return Disposition::RequiresApproval {
            reason: "zero recommended quantity".to_string(),
        };
    }

    let cost = plan.estimated_cost;
    let trust = plan.facts.reliability_score;
    if cost < policy.auto_order_threshold && trust >= policy.vendor_trust_threshold {
        Disposition::AutoApprove
    } else {
        Disposition::RequiresApproval {
            reason: format!(
                "cost=${cost:.2} >= ${:.2} or trust={trust:.2} < {:.2}",
                policy.auto_order_threshold, policy.vendor_trust_threshold
            ),
        }
    }
}

/// One line of an approval notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub sku: Sku,
    pub vendor: Option<VendorId>,
    pub vendor_name: String,
    pub quantity: u64,
    pub estimated_cost: f64,
    pub urgency: UrgencyLevel,
    pub rationale: String,
    pub reason: String,
    pub task: Option<TaskRef>,
}

impl ApprovalRequest {
    pub fn from_plan(plan: &ReorderPlan, reason: impl Into<String>, task: Option<TaskRef>) -> Self {
        Self {
            sku: plan.sku.clone(),
            vendor: plan.selected_vendor.clone(),
            vendor_name: plan.facts.vendor_name.clone(),
            quantity: plan.recommended_quantity,
            estimated_cost: plan.estimated_cost,
            urgency: plan.urgency_level,
            rationale: plan.rationale.clone(),
            reason: reason.into(),
            task,
        }
    }
}

/// All approval requests of one cycle, sent as a single notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalBatch {
    pub cycle_id: CycleId,
    pub created_at: DateTime<Utc>,
    pub requests: Vec<ApprovalRequest>,
}

impl ApprovalBatch {
    pub fn total_cost(&self) -> f64 {
        self.requests.iter().map(|r| r.estimated_cost).sum()
    }

    pub fn highest_urgency(&self) -> UrgencyLevel {
        self.requests
            .iter()
            .map(|r| r.urgency)
            .max()
            .unwrap_or(UrgencyLevel::None)
    }
}
