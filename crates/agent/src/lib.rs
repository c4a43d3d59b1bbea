//! Reorder agent wiring: environment configuration and cycle assembly.

pub mod app;
pub mod config;

pub use app::{AgentCycle, build_cycle, run};
pub use config::{AgentConfig, RationaleMode};
