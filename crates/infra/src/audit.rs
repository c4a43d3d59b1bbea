//! Append-only record of what the agent did, one entry per action.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use restock_core::{CycleId, Sku, VendorId};

use crate::orders::OrderId;
use crate::sinks::SinkError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ReorderEvaluated,
    EvaluationSkipped,
    TaskUpserted,
    AutoOrderPlaced,
    AutoOrderFailed,
    TaskMarkedOrdered,
    ApprovalRequested,
    ApprovalBatchSent,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub timestamp: DateTime<Utc>,
    pub cycle_id: CycleId,
    /// `None` for cycle-wide actions such as sending the approval batch.
    pub sku: Option<Sku>,
    pub action: Action,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorId>,
}

impl ActionRecord {
    pub fn new(cycle_id: CycleId, sku: Option<Sku>, action: Action, status: ActionStatus) -> Self {
        Self {
            timestamp: Utc::now(),
            cycle_id,
            sku,
            action,
            status,
            details: String::new(),
            order_id: None,
            cost: None,
            vendor: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_order(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_vendor(mut self, vendor: Option<VendorId>) -> Self {
        self.vendor = vendor;
        self
    }
}

pub trait ActionLog: Send + Sync + 'static {
    fn record(&self, entry: &ActionRecord) -> Result<(), SinkError>;
}

impl<S> ActionLog for Arc<S>
where
    S: ActionLog + ?Sized,
{
    fn record(&self, entry: &ActionRecord) -> Result<(), SinkError> {
        (**self).record(entry)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryActionLog {
    inner: Mutex<Vec<ActionRecord>>,
    fail_with: Option<String>,
}

impl InMemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<ActionRecord> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn actions_for(&self, sku: &Sku) -> Vec<Action> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.sku.as_ref() == Some(sku))
            .map(|r| r.action)
            .collect()
    }
}

impl ActionLog for InMemoryActionLog {
    fn record(&self, entry: &ActionRecord) -> Result<(), SinkError> {
        if let Some(reason) = &self.fail_with {
            return Err(SinkError::Unavailable(reason.clone()));
        }
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(())
    }
}

/// Writes each entry as a structured log line.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogActionLog;

impl ActionLog for LogActionLog {
    fn record(&self, entry: &ActionRecord) -> Result<(), SinkError> {
        info!(
            cycle = %entry.cycle_id,
            sku = ?entry.sku.as_ref().map(Sku::as_str),
            action = ?entry.action,
            status = ?entry.status,
            order_id = ?entry.order_id.as_ref().map(|o| o.0.as_str()),
            cost = ?entry.cost,
            details = %entry.details,
            "agent action"
        );
        Ok(())
    }
}

/// Appends one JSON object per line to a file, creating it on first write.
#[derive(Debug)]
pub struct JsonLinesActionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesActionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActionLog for JsonLinesActionLog {
    fn record(&self, entry: &ActionRecord) -> Result<(), SinkError> {
        let mut line =
            serde_json::to_string(entry).map_err(|e| SinkError::Rejected(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SinkError::Unavailable(format!("create {}: {e}", parent.display()))
            })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()))
            .map_err(|e| SinkError::Unavailable(format!("append {}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lines_log_appends_one_record_per_line() {
        let dir = std::env::temp_dir().join(format!("restock-actions-{}", CycleId::new()));
        let log = JsonLinesActionLog::new(dir.join("actions.jsonl"));
        let cycle = CycleId::new();

        log.record(
            &ActionRecord::new(cycle, Some(Sku::from("A")), Action::AutoOrderPlaced, ActionStatus::Success)
                .with_order(OrderId("PO-1".into()))
                .with_cost(42.5)
                .with_vendor(Some(VendorId::from("V1"))),
        )
        .unwrap();
        log.record(&ActionRecord::new(cycle, None, Action::ApprovalBatchSent, ActionStatus::Success))
            .unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        let records: Vec<ActionRecord> = raw
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_id, Some(OrderId("PO-1".into())));
        assert_eq!(records[0].cost, Some(42.5));
        assert!(raw.lines().next().unwrap().contains("\"action\":\"auto_order_placed\""));
        assert_eq!(records[1].sku, None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn in_memory_log_filters_by_sku() {
        let log = InMemoryActionLog::new();
        let cycle = CycleId::new();
        for (sku, action) in [("A", Action::ReorderEvaluated), ("B", Action::TaskUpserted), ("A", Action::TaskUpserted)] {
            log.record(&ActionRecord::new(cycle, Some(Sku::from(sku)), action, ActionStatus::Success))
                .unwrap();
        }
        assert_eq!(
            log.actions_for(&Sku::from("A")),
            vec![Action::ReorderEvaluated, Action::TaskUpserted]
        );
    }
}
