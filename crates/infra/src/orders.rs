//! Supplier collaborator: places purchase orders for auto-approved plans.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use restock_core::{CycleId, Sku, VendorId};
use restock_reorder::ReorderPlan;

/// Supplier-assigned purchase order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("supplier unavailable: {0}")]
    Unavailable(String),

    #[error("order rejected: {0}")]
    Rejected(String),
}

/// What gets sent to the supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub cycle_id: CycleId,
    pub sku: Sku,
    pub vendor: VendorId,
    pub quantity: u64,
    pub unit_price: f64,
    pub estimated_cost: f64,
}

impl PurchaseOrder {
    /// `None` when the plan orders nothing or names no vendor.
    pub fn from_plan(plan: &ReorderPlan, cycle_id: CycleId) -> Option<Self> {
        if !plan.orders_stock() {
            return None;
        }
        let vendor = plan.selected_vendor.clone()?;
        Some(Self {
            cycle_id,
            sku: plan.sku.clone(),
            vendor,
            quantity: plan.recommended_quantity,
            unit_price: plan.facts.unit_price,
            estimated_cost: plan.estimated_cost,
        })
    }
}

/// An order the supplier accepted, as listed in a cycle report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub sku: Sku,
    pub vendor: VendorId,
    pub quantity: u64,
    pub estimated_cost: f64,
}

impl PlacedOrder {
    pub fn new(order_id: OrderId, order: &PurchaseOrder) -> Self {
        Self {
            order_id,
            sku: order.sku.clone(),
            vendor: order.vendor.clone(),
            quantity: order.quantity,
            estimated_cost: order.estimated_cost,
        }
    }
}

pub trait OrderSink: Send + Sync + 'static {
    fn place_order(&self, order: &PurchaseOrder) -> Result<OrderId, OrderError>;
}

impl<S> OrderSink for Arc<S>
where
    S: OrderSink + ?Sized,
{
    fn place_order(&self, order: &PurchaseOrder) -> Result<OrderId, OrderError> {
        (**self).place_order(order)
    }
}

/// In-memory supplier for tests/dev. Order ids are `PO-00001`, `PO-00002`, ...
#[derive(Debug, Default)]
pub struct InMemoryOrderSink {
    inner: Mutex<Vec<(OrderId, PurchaseOrder)>>,
    fail_with: Option<String>,
}

impl InMemoryOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A supplier that rejects every order.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<(OrderId, PurchaseOrder)> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl OrderSink for InMemoryOrderSink {
    fn place_order(&self, order: &PurchaseOrder) -> Result<OrderId, OrderError> {
        if let Some(reason) = &self.fail_with {
            return Err(OrderError::Rejected(reason.clone()));
        }
        let mut placed = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = OrderId(format!("PO-{:05}", placed.len() + 1));
        placed.push((id.clone(), order.clone()));
        Ok(id)
    }
}

/// Supplier stand-in that logs the order and derives an id from cycle and SKU.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogOrderSink;

impl OrderSink for LogOrderSink {
    fn place_order(&self, order: &PurchaseOrder) -> Result<OrderId, OrderError> {
        let id = OrderId(format!("PO-{}-{}", order.cycle_id, order.sku));
        info!(
            order_id = %id,
            sku = %order.sku,
            vendor = %order.vendor,
            quantity = order.quantity,
            estimated_cost = order.estimated_cost,
            "purchase order placed"
        );
        Ok(id)
    }
}
