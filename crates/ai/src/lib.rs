//! `restock-ai`
//!
//! **Responsibility:** Optional rationale-generation boundary.
//!
//! This crate is intentionally **not** part of the decision logic:
//! - It must not depend on the reorder engine.
//! - It must not change a decision, only describe one.
//! - Its failures are always recoverable by the caller.

pub mod facts;
pub mod rationale;
pub mod result;
pub mod template;

pub use facts::DecisionFacts;
pub use rationale::RationaleGenerator;
pub use result::AiError;
pub use template::TemplateRationale;
