//! Reorder decision engine.
//!
//! Given one inventory item and the offers of its candidate vendors, decide
//! whether to reorder, how much, and from whom. Implemented purely as
//! deterministic logic (no IO, no HTTP, no storage); every call is independent
//! of every other, so batches can be evaluated in parallel freely.

pub mod config;
pub mod engine;
pub mod eoq;
pub mod plan;
pub mod urgency;
pub mod vendor;

pub use config::{ReorderConfig, UrgencyThresholds};
pub use engine::{ReorderEngine, evaluate, fallback_rationale};
pub use eoq::{economic_order_quantity, safety_stock};
pub use plan::{RationaleSource, ReorderPlan};
pub use vendor::select_vendor;
