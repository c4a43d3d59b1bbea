use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use restock_ai::TemplateRationale;
use restock_infra::{
    JsonFileSource, JsonLinesActionLog, LogNotificationSink, LogTaskSink, ReorderCycle, ReorderRunner,
};
use restock_reorder::ReorderEngine;

use crate::config::{AgentConfig, RationaleMode};

/// Cycle backed by a JSON snapshot file and log-only sinks.
pub type AgentCycle = ReorderCycle<JsonFileSource, JsonFileSource, LogTaskSink, LogNotificationSink>;

pub fn build_cycle(config: &AgentConfig) -> anyhow::Result<AgentCycle> {
    let mut engine =
        ReorderEngine::new(config.reorder.clone()).context("invalid reorder configuration")?;
    if config.rationale == RationaleMode::Template {
        engine = engine.with_rationale(Arc::new(TemplateRationale::new()));
    }

    let source = Arc::new(JsonFileSource::new(config.snapshot_path.clone()));
    let mut cycle = ReorderCycle::new(
        engine,
        source.clone(),
        source,
        Arc::new(LogTaskSink),
        Arc::new(LogNotificationSink),
    )
    .with_policy(config.approval.clone())
    .with_retry(config.retry.clone())
    .with_workers(config.workers);
    if let Some(path) = &config.action_log_path {
        cycle = cycle.with_action_log(JsonLinesActionLog::new(path.clone()));
    }
    Ok(cycle)
}

/// Run a single cycle and print its report, or keep running on the interval.
pub fn run(config: AgentConfig) -> anyhow::Result<()> {
    let cycle = build_cycle(&config)?;
    info!(
        snapshot = %config.snapshot_path.display(),
        dry_run = config.approval.dry_run,
        workers = config.workers,
        "reorder agent configured"
    );

    if config.run_once {
        let report = cycle.run();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let handle = ReorderRunner::new(config.interval)
        .spawn("reorder-runner", Arc::new(cycle))
        .context("failed to spawn reorder runner")?;
    handle.wait();
    Ok(())
}
