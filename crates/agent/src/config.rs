//! Agent configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};

use restock_infra::{ApprovalPolicy, RetryPolicy};
use restock_reorder::ReorderConfig;

pub const DEFAULT_SNAPSHOT_PATH: &str = "demo/inventory.json";

/// Which rationale generator to attach to the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RationaleMode {
    /// Deterministic template summaries.
    Template,
    /// Engine fallback text only.
    Off,
}

impl FromStr for RationaleMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(RationaleMode::Template),
            "off" | "none" => Ok(RationaleMode::Off),
            other => bail!("unknown rationale mode {other:?} (expected \"template\" or \"off\")"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub snapshot_path: PathBuf,
    /// JSON-lines action log; structured log lines only when unset.
    pub action_log_path: Option<PathBuf>,
    pub run_once: bool,
    pub interval: Duration,
    pub workers: usize,
    pub rationale: RationaleMode,
    pub reorder: ReorderConfig,
    pub approval: ApprovalPolicy,
    pub retry: RetryPolicy,
}

impl AgentConfig {
    /// Read `RESTOCK_*` variables from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = match lookup("RESTOCK_SNAPSHOT_PATH") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => {
                tracing::warn!(path = DEFAULT_SNAPSHOT_PATH, "RESTOCK_SNAPSHOT_PATH not set; using demo snapshot");
                PathBuf::from(DEFAULT_SNAPSHOT_PATH)
            }
        };

        let default_workers = std::thread::available_parallelism().map_or(1, |n| n.get());

        let mut reorder = ReorderConfig::default();
        if let Some(v) = parse(&lookup, "RESTOCK_ORDERING_COST")? {
            reorder.ordering_cost = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_HOLDING_COST_RATE")? {
            reorder.holding_cost_rate = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_SAFETY_STOCK_MULTIPLIER")? {
            reorder.safety_stock_multiplier = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_FORECAST_PERIOD_DAYS")? {
            reorder.forecast_period_days = v;
        }
        reorder.default_demand_forecast = parse(&lookup, "RESTOCK_DEFAULT_DEMAND_FORECAST")?;
        if let Some(v) = parse(&lookup, "RESTOCK_MIN_ORDER_QUANTITY")? {
            reorder.min_order_quantity = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_URGENCY_MEDIUM_FRACTION")? {
            reorder.urgency.medium_fraction = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_URGENCY_HIGH_AT_OR_BELOW")? {
            reorder.urgency.high_at_or_below = v;
        }
        reorder
            .validate()
            .context("invalid reorder configuration")?;

        let mut approval = ApprovalPolicy::default();
        if let Some(v) = parse(&lookup, "RESTOCK_AUTO_ORDER_THRESHOLD")? {
            approval.auto_order_threshold = v;
        }
        if let Some(v) = parse(&lookup, "RESTOCK_VENDOR_TRUST_THRESHOLD")? {
            approval.vendor_trust_threshold = v;
        }
        approval.dry_run = parse_flag(&lookup, "RESTOCK_DRY_RUN")?.unwrap_or(false);

        let mut retry = RetryPolicy::default();
        if let Some(v) = parse(&lookup, "RESTOCK_MAX_RETRIES")? {
            retry.max_retries = v;
        }

        Ok(Self {
            snapshot_path,
            action_log_path: lookup("RESTOCK_ACTION_LOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            run_once: parse_flag(&lookup, "RESTOCK_RUN_ONCE")?.unwrap_or(false),
            interval: Duration::from_secs(parse(&lookup, "RESTOCK_INTERVAL_SECS")?.unwrap_or(3600)),
            workers: parse::<usize, _>(&lookup, "RESTOCK_WORKERS")?
                .unwrap_or(default_workers)
                .max(1),
            rationale: parse(&lookup, "RESTOCK_RATIONALE")?.unwrap_or(RationaleMode::Template),
            reorder,
            approval,
            retry,
        })
    }
}

fn parse<T, F>(lookup: &F, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{name}={raw:?}: {e}")),
    }
}

fn parse_flag<F>(lookup: &F, name: &str) -> anyhow::Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => bail!("{name}={v:?}: expected a boolean"),
        },
    }
}
