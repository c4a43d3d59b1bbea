//! Downstream collaborators: task creation and approval notification.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use restock_core::Sku;
use restock_reorder::ReorderPlan;

use crate::approval::{ApprovalBatch, Disposition};
use crate::orders::OrderId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("sink rejected payload: {0}")]
    Rejected(String),
}

/// Handle to a task created downstream (e.g. a page in a task board).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRef(pub String);

impl core::fmt::Display for TaskRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task-creation collaborator, keyed by SKU.
///
/// Calling `upsert_task` again for the same SKU replaces that SKU's task
/// contents with the newer plan.
pub trait TaskSink: Send + Sync + 'static {
    fn upsert_task(&self, plan: &ReorderPlan, disposition: &Disposition) -> Result<TaskRef, SinkError>;

    /// Flag the task as ordered once the supplier accepted the purchase order.
    fn mark_ordered(&self, task: &TaskRef, order: &OrderId) -> Result<(), SinkError>;
}

/// Notification collaborator for plans that need human approval.
pub trait NotificationSink: Send + Sync + 'static {
    fn send_approval_batch(&self, batch: &ApprovalBatch) -> Result<(), SinkError>;
}

impl<S> TaskSink for Arc<S>
where
    S: TaskSink + ?Sized,
{
    fn upsert_task(&self, plan: &ReorderPlan, disposition: &Disposition) -> Result<TaskRef, SinkError> {
        (**self).upsert_task(plan, disposition)
    }

    fn mark_ordered(&self, task: &TaskRef, order: &OrderId) -> Result<(), SinkError> {
        (**self).mark_ordered(task, order)
    }
}

impl<S> NotificationSink for Arc<S>
where
    S: NotificationSink + ?Sized,
{
    fn send_approval_batch(&self, batch: &ApprovalBatch) -> Result<(), SinkError> {
        (**self).send_approval_batch(batch)
    }
}

fn task_ref_for(sku: &Sku) -> TaskRef {
    TaskRef(format!("reorder-{sku}"))
}

/// Stored task contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub task: TaskRef,
    pub plan: ReorderPlan,
    pub disposition: Disposition,
    /// How many times the task was written.
    pub revisions: u32,
    /// Set when the current plan was ordered; cleared by the next upsert.
    pub order_id: Option<OrderId>,
}

/// In-memory task sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTaskSink {
    inner: Mutex<BTreeMap<Sku, TaskRecord>>,
    fail_with: Option<String>,
}

impl InMemoryTaskSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every call fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, sku: &Sku) -> Option<TaskRecord> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(sku)
            .cloned()
    }

    pub fn all(&self) -> Vec<TaskRecord> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

impl TaskSink for InMemoryTaskSink {
    fn upsert_task(&self, plan: &ReorderPlan, disposition: &Disposition) -> Result<TaskRef, SinkError> {
        if let Some(reason) = &self.fail_with {
            return Err(SinkError::Unavailable(reason.clone()));
        }
        let task = task_ref_for(&plan.sku);
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let revisions = map.get(&plan.sku).map_or(0, |r| r.revisions) + 1;
        map.insert(
            plan.sku.clone(),
            TaskRecord {
                task: task.clone(),
                plan: plan.clone(),
                disposition: disposition.clone(),
                revisions,
                order_id: None,
            },
        );
        Ok(task)
    }

    fn mark_ordered(&self, task: &TaskRef, order: &OrderId) -> Result<(), SinkError> {
        if let Some(reason) = &self.fail_with {
            return Err(SinkError::Unavailable(reason.clone()));
        }
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let record = map
            .values_mut()
            .find(|r| r.task == *task)
            .ok_or_else(|| SinkError::Rejected(format!("unknown task {task}")))?;
        record.order_id = Some(order.clone());
        Ok(())
    }
}

/// In-memory notification sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    inner: Mutex<Vec<ApprovalBatch>>,
    fail_with: Option<String>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<ApprovalBatch> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn send_approval_batch(&self, batch: &ApprovalBatch) -> Result<(), SinkError> {
        if let Some(reason) = &self.fail_with {
            return Err(SinkError::Unavailable(reason.clone()));
        }
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(batch.clone());
        Ok(())
    }
}

/// Task sink that only writes structured log lines.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogTaskSink;

impl TaskSink for LogTaskSink {
    fn upsert_task(&self, plan: &ReorderPlan, disposition: &Disposition) -> Result<TaskRef, SinkError> {
        let task = task_ref_for(&plan.sku);
        info!(
            task = %task,
            sku = %plan.sku,
            quantity = plan.recommended_quantity,
            vendor = ?plan.selected_vendor,
            estimated_cost = plan.estimated_cost,
            urgency = %plan.urgency_level,
            auto_approved = disposition.is_auto(),
            rationale = %plan.rationale,
            "reorder task upserted"
        );
        Ok(task)
    }

    fn mark_ordered(&self, task: &TaskRef, order: &OrderId) -> Result<(), SinkError> {
        info!(task = %task, order_id = %order, "reorder task marked ordered");
        Ok(())
    }
}

/// Notification sink that only writes structured log lines.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn send_approval_batch(&self, batch: &ApprovalBatch) -> Result<(), SinkError> {
        info!(
            cycle = %batch.cycle_id,
            requests = batch.requests.len(),
            total_cost = batch.total_cost(),
            highest_urgency = %batch.highest_urgency(),
            "approval batch ready"
        );
        for r in &batch.requests {
            info!(
                cycle = %batch.cycle_id,
                sku = %r.sku,
                vendor = %r.vendor_name,
                quantity = r.quantity,
                estimated_cost = r.estimated_cost,
                urgency = %r.urgency,
                reason = %r.reason,
                "approval requested"
            );
        }
        Ok(())
    }
}
