//! One pass over the inventory: fetch, evaluate, route, hand off.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use restock_core::{CycleId, ErrorKind};
use restock_inventory::InventoryItem;
use restock_reorder::{ReorderEngine, ReorderPlan};

use crate::approval::{ApprovalBatch, ApprovalPolicy, ApprovalRequest, Disposition, route};
use crate::audit::{Action, ActionLog, ActionRecord, ActionStatus, LogActionLog};
use crate::batch::{OfferBook, SkippedSku, evaluate_batch_parallel};
use crate::orders::{LogOrderSink, OrderSink, PlacedOrder, PurchaseOrder};
use crate::retry::RetryPolicy;
use crate::sinks::{NotificationSink, TaskRef, TaskSink};
use crate::sources::{InventorySource, SourceError, VendorOfferSource};

/// Summary of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub started_at: DateTime<Utc>,
    /// SKUs evaluated without error (triggered or not).
    pub processed_skus: usize,
    pub reorders_recommended: usize,
    pub auto_approved: usize,
    pub approval_requests: usize,
    pub approval_batches_sent: usize,
    /// Orders the supplier accepted for auto-approved plans.
    pub orders_placed: Vec<PlacedOrder>,
    /// Auto-approved plans whose order failed; these go to approval instead.
    pub auto_orders_failed: usize,
    pub skipped: Vec<SkippedSku>,
    /// Collaborator failures (fetch, task, order, notification, action log).
    pub errors: Vec<String>,
    pub plans: Vec<ReorderPlan>,
    pub duration_ms: u64,
}

impl CycleReport {
    fn new(cycle_id: CycleId, started_at: DateTime<Utc>) -> Self {
        Self {
            cycle_id,
            started_at,
            processed_skus: 0,
            reorders_recommended: 0,
            auto_approved: 0,
            approval_requests: 0,
            approval_batches_sent: 0,
            orders_placed: Vec::new(),
            auto_orders_failed: 0,
            skipped: Vec::new(),
            errors: Vec::new(),
            plans: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty()
    }
}

/// Everything needed to run a reorder cycle.
///
/// Supplier and action log default to the log-only adapters.
pub struct ReorderCycle<I, O, T, N> {
    engine: ReorderEngine,
    inventory: Arc<I>,
    offers: Arc<O>,
    tasks: Arc<T>,
    notifications: Arc<N>,
    orders: Arc<dyn OrderSink>,
    actions: Arc<dyn ActionLog>,
    policy: ApprovalPolicy,
    retry: RetryPolicy,
    workers: usize,
}

impl<I, O, T, N> core::fmt::Debug for ReorderCycle<I, O, T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReorderCycle")
            .field("engine", &self.engine)
            .field("policy", &self.policy)
            .field("retry", &self.retry)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl<I, O, T, N> ReorderCycle<I, O, T, N>
where
    I: InventorySource,
    O: VendorOfferSource,
    T: TaskSink,
    N: NotificationSink,
{
    pub fn new(engine: ReorderEngine, inventory: Arc<I>, offers: Arc<O>, tasks: Arc<T>, notifications: Arc<N>) -> Self {
        Self {
            engine,
            inventory,
            offers,
            tasks,
            notifications,
            orders: Arc::new(LogOrderSink),
            actions: Arc::new(LogActionLog),
            policy: ApprovalPolicy::default(),
            retry: RetryPolicy::default(),
            workers: 1,
        }
    }

    pub fn with_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_orders(mut self, orders: impl OrderSink) -> Self {
        self.orders = Arc::new(orders);
        self
    }

    pub fn with_action_log(mut self, actions: impl ActionLog) -> Self {
        self.actions = Arc::new(actions);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// Run one cycle. Never panics on collaborator failure; everything that
    /// went wrong is in the report.
    pub fn run(&self) -> CycleReport {
        let clock = Instant::now();
        let mut report = CycleReport::new(CycleId::new(), Utc::now());
        let cycle_id = report.cycle_id;
        info!(cycle = %cycle_id, "reorder cycle started");

        let items = match self.retry.run_if(
            "fetch inventory",
            || self.inventory.fetch_items(),
            SourceError::is_transient,
        ) {
            Ok(items) => items,
            Err(e) => {
                error!(cycle = %cycle_id, error = %e, "failed to fetch inventory; skipping cycle");
                report.errors.push(format!("failed to fetch inventory: {e}"));
                return finish(report, clock);
            }
        };
        if items.is_empty() {
            warn!(cycle = %cycle_id, "inventory snapshot is empty");
            return finish(report, clock);
        }

        let (evaluable, book, mut skipped) = self.fetch_offers(items);

        let outcome = evaluate_batch_parallel(&self.engine, &evaluable, &book, self.workers);
        report.processed_skus = outcome.evaluated();
        report.reorders_recommended = outcome.plans.len();
        skipped.extend(outcome.skipped);
        for skip in &skipped {
            self.record(
                &mut report,
                ActionRecord::new(cycle_id, Some(skip.sku.clone()), Action::EvaluationSkipped, ActionStatus::Error)
                    .with_details(format!("{}: {}", skip.kind, skip.message)),
            );
        }
        report.skipped = skipped;

        let mut requests = Vec::new();
        for plan in &outcome.plans {
            self.record(
                &mut report,
                ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::ReorderEvaluated, ActionStatus::Success)
                    .with_details(format!("quantity={} urgency={}", plan.recommended_quantity, plan.urgency_level))
                    .with_cost(plan.estimated_cost)
                    .with_vendor(plan.selected_vendor.clone()),
            );

            let disposition = route(plan, &self.policy);
            let task = match self.tasks.upsert_task(plan, &disposition) {
                Ok(task) => {
                    self.record(
                        &mut report,
                        ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::TaskUpserted, ActionStatus::Success)
                            .with_details(task.to_string()),
                    );
                    Some(task)
                }
                Err(e) => {
                    warn!(cycle = %cycle_id, sku = %plan.sku, error = %e, "failed to upsert reorder task");
                    report.errors.push(format!("task for SKU {}: {e}", plan.sku));
                    self.record(
                        &mut report,
                        ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::TaskUpserted, ActionStatus::Error)
                            .with_details(e.to_string()),
                    );
                    None
                }
            };

            let reason = match disposition {
                Disposition::AutoApprove => {
                    report.auto_approved += 1;
                    if self.place_auto_order(&mut report, plan, task.as_ref()) {
                        continue;
                    }
                    "auto_order_failed".to_string()
                }
                Disposition::RequiresApproval { reason } => reason,
            };
            self.record(
                &mut report,
                ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::ApprovalRequested, ActionStatus::Success)
                    .with_details(reason.clone())
                    .with_cost(plan.estimated_cost)
                    .with_vendor(plan.selected_vendor.clone()),
            );
            requests.push(ApprovalRequest::from_plan(plan, reason, task));
        }

        if !requests.is_empty() {
            let batch = ApprovalBatch {
                cycle_id,
                created_at: Utc::now(),
                requests,
            };
            match self.notifications.send_approval_batch(&batch) {
                Ok(()) => {
                    report.approval_requests = batch.requests.len();
                    report.approval_batches_sent = 1;
                    self.record(
                        &mut report,
                        ActionRecord::new(cycle_id, None, Action::ApprovalBatchSent, ActionStatus::Success)
                            .with_details(format!("{} request(s)", batch.requests.len()))
                            .with_cost(batch.total_cost()),
                    );
                }
                Err(e) => {
                    error!(cycle = %cycle_id, requests = batch.requests.len(), error = %e, "failed to send approval batch");
                    report.errors.push(format!("approval batch: {e}"));
                    self.record(
                        &mut report,
                        ActionRecord::new(cycle_id, None, Action::ApprovalBatchSent, ActionStatus::Error)
                            .with_details(e.to_string()),
                    );
                }
            }
        }

        report.plans = outcome.plans;
        finish(report, clock)
    }

    /// Place the order for an auto-approved plan and flag its task. Returns
    /// `false` when the supplier did not accept it.
    fn place_auto_order(&self, report: &mut CycleReport, plan: &ReorderPlan, task: Option<&TaskRef>) -> bool {
        let cycle_id = report.cycle_id;
        let placed = match PurchaseOrder::from_plan(plan, cycle_id) {
            Some(order) => self
                .orders
                .place_order(&order)
                .map(|id| PlacedOrder::new(id, &order))
                .map_err(|e| e.to_string()),
            None => Err("plan has nothing to order".to_string()),
        };

        let placed = match placed {
            Ok(placed) => placed,
            Err(e) => {
                warn!(cycle = %cycle_id, sku = %plan.sku, error = %e, "auto order failed; requesting approval");
                report.auto_orders_failed += 1;
                report.errors.push(format!("auto order for SKU {}: {e}", plan.sku));
                self.record(
                    report,
                    ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::AutoOrderFailed, ActionStatus::Error)
                        .with_details(e)
                        .with_cost(plan.estimated_cost)
                        .with_vendor(plan.selected_vendor.clone()),
                );
                return false;
            }
        };

        info!(cycle = %cycle_id, sku = %plan.sku, order_id = %placed.order_id, "auto order placed");
        self.record(
            report,
            ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::AutoOrderPlaced, ActionStatus::Success)
                .with_order(placed.order_id.clone())
                .with_cost(placed.estimated_cost)
                .with_vendor(Some(placed.vendor.clone())),
        );

        if let Some(task) = task {
            let entry = match self.tasks.mark_ordered(task, &placed.order_id) {
                Ok(()) => ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::TaskMarkedOrdered, ActionStatus::Success),
                Err(e) => {
                    warn!(cycle = %cycle_id, sku = %plan.sku, task = %task, error = %e, "failed to mark task ordered");
                    report.errors.push(format!("mark task {task} ordered: {e}"));
                    ActionRecord::new(cycle_id, Some(plan.sku.clone()), Action::TaskMarkedOrdered, ActionStatus::Error)
                        .with_details(e.to_string())
                }
            };
            self.record(report, entry.with_order(placed.order_id.clone()));
        }

        report.orders_placed.push(placed);
        true
    }

    fn record(&self, report: &mut CycleReport, entry: ActionRecord) {
        if let Err(e) = self.actions.record(&entry) {
            warn!(cycle = %entry.cycle_id, action = ?entry.action, error = %e, "failed to record action");
            report.errors.push(format!("action log: {e}"));
        }
    }

    fn fetch_offers(&self, items: Vec<InventoryItem>) -> (Vec<InventoryItem>, OfferBook, Vec<SkippedSku>) {
        let mut evaluable = Vec::with_capacity(items.len());
        let mut book = OfferBook::with_capacity(items.len());
        let mut skipped = Vec::new();

        for item in items {
            let fetched = self.retry.run_if(
                "fetch vendor offers",
                || self.offers.offers_for(&item.sku),
                SourceError::is_transient,
            );
            match fetched {
                Ok(offers) => {
                    book.insert(item.sku.clone(), offers);
                    evaluable.push(item);
                }
                Err(e) => {
                    warn!(sku = %item.sku, error = %e, "skipping SKU: vendor offers unavailable");
                    skipped.push(SkippedSku {
                        sku: item.sku,
                        kind: ErrorKind::Source,
                        message: e.to_string(),
                    });
                }
            }
        }
        (evaluable, book, skipped)
    }
}

fn finish(mut report: CycleReport, clock: Instant) -> CycleReport {
    report.duration_ms = clock.elapsed().as_millis() as u64;
    info!(
        cycle = %report.cycle_id,
        processed = report.processed_skus,
        reorders = report.reorders_recommended,
        auto_approved = report.auto_approved,
        approval_requests = report.approval_requests,
        orders_placed = report.orders_placed.len(),
        skipped = report.skipped.len(),
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "reorder cycle complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use restock_core::Sku;
    use restock_inventory::VendorOffer;
    use restock_reorder::ReorderConfig;

    use crate::audit::InMemoryActionLog;
    use crate::orders::{InMemoryOrderSink, OrderId};
    use crate::sinks::{InMemoryNotificationSink, InMemoryTaskSink};
    use crate::sources::InMemorySource;

    fn item(sku: &str, on_hand: i64, forecast: f64) -> InventoryItem {
        InventoryItem::new(sku, on_hand, 10)
            .with_lead_time_days(2)
            .with_unit_cost(10.0)
            .with_demand_forecast(forecast)
            .with_vendor("v1")
    }

    fn source() -> InMemorySource {
        let items = vec![
            item("CHEAP", 3, 0.1),   // 38 units * $1 => auto-approve
            item("PRICEY", 3, 5.0),  // 270 units * $1 => approval
            item("FINE", 40, 5.0),   // not triggered
            item("BROKEN", 2, 5.0).with_unit_cost(0.0),
        ];
        let offers: HashMap<Sku, Vec<VendorOffer>> = items
            .iter()
            .map(|i| {
                let price = if i.sku.as_str() == "PRICEY" { 100.0 } else { 1.0 };
                (i.sku.clone(), vec![VendorOffer::new("v1", price, 0.9)])
            })
            .collect();
        InMemorySource::from_parts(items, offers)
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::exponential(2, Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn routes_plans_and_reports_everything() {
        let src = Arc::new(source());
        let tasks = Arc::new(InMemoryTaskSink::new());
        let notes = Arc::new(InMemoryNotificationSink::new());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            tasks.clone(),
            notes.clone(),
        )
        .with_retry(fast_retry())
        .with_workers(2);

        let report = cycle.run();

        assert_eq!(report.processed_skus, 3);
        assert_eq!(report.reorders_recommended, 2);
        assert_eq!(report.auto_approved, 1);
        assert_eq!(report.approval_requests, 1);
        assert_eq!(report.approval_batches_sent, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].sku.as_str(), "BROKEN");
        assert_eq!(report.skipped[0].kind, ErrorKind::Configuration);
        assert!(report.errors.is_empty());

        assert_eq!(tasks.all().len(), 2);
        assert!(tasks.get(&Sku::from("CHEAP")).unwrap().disposition.is_auto());

        let batches = notes.all();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].cycle_id, report.cycle_id);
        assert_eq!(batches[0].requests[0].sku.as_str(), "PRICEY");
        assert_eq!(
            batches[0].requests[0].task.as_ref().map(|t| t.0.as_str()),
            Some("reorder-PRICEY")
        );
    }

    #[test]
    fn auto_approved_plan_is_ordered_and_logged() {
        let src = Arc::new(source());
        let tasks = Arc::new(InMemoryTaskSink::new());
        let orders = Arc::new(InMemoryOrderSink::new());
        let actions = Arc::new(InMemoryActionLog::new());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            tasks.clone(),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_orders(orders.clone())
        .with_action_log(actions.clone())
        .with_retry(fast_retry());

        let report = cycle.run();

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.orders_placed.len(), 1);
        let placed = &report.orders_placed[0];
        assert_eq!(placed.sku.as_str(), "CHEAP");
        assert_eq!(placed.order_id, OrderId("PO-00001".into()));

        let sent = orders.all();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.cycle_id, report.cycle_id);
        assert_eq!(
            tasks.get(&Sku::from("CHEAP")).unwrap().order_id,
            Some(OrderId("PO-00001".into()))
        );
        assert_eq!(tasks.get(&Sku::from("PRICEY")).unwrap().order_id, None);

        assert_eq!(
            actions.actions_for(&Sku::from("CHEAP")),
            vec![
                Action::ReorderEvaluated,
                Action::TaskUpserted,
                Action::AutoOrderPlaced,
                Action::TaskMarkedOrdered,
            ]
        );
        assert_eq!(
            actions.actions_for(&Sku::from("PRICEY")),
            vec![Action::ReorderEvaluated, Action::TaskUpserted, Action::ApprovalRequested]
        );
        assert_eq!(actions.actions_for(&Sku::from("BROKEN")), vec![Action::EvaluationSkipped]);

        let ordered = actions
            .all()
            .into_iter()
            .find(|r| r.action == Action::AutoOrderPlaced)
            .unwrap();
        assert_eq!(ordered.order_id, Some(placed.order_id.clone()));
        assert_eq!(ordered.cost, Some(placed.estimated_cost));
        assert_eq!(ordered.vendor.as_ref().map(|v| v.as_str()), Some("v1"));
    }

    #[test]
    fn failed_auto_order_falls_back_to_approval() {
        let src = Arc::new(source());
        let notes = Arc::new(InMemoryNotificationSink::new());
        let actions = Arc::new(InMemoryActionLog::new());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::new()),
            notes.clone(),
        )
        .with_orders(InMemoryOrderSink::failing("credit hold"))
        .with_action_log(actions.clone())
        .with_retry(fast_retry());

        let report = cycle.run();

        assert_eq!(report.auto_approved, 1);
        assert_eq!(report.auto_orders_failed, 1);
        assert!(report.orders_placed.is_empty());
        assert_eq!(report.approval_requests, 2);
        assert_eq!(report.errors, vec!["auto order for SKU CHEAP: order rejected: credit hold".to_string()]);

        let cheap = notes.all()[0]
            .requests
            .iter()
            .find(|r| r.sku.as_str() == "CHEAP")
            .cloned()
            .unwrap();
        assert_eq!(cheap.reason, "auto_order_failed");
        assert!(actions.actions_for(&Sku::from("CHEAP")).contains(&Action::AutoOrderFailed));
    }

    #[test]
    fn action_log_failures_are_reported() {
        let src = Arc::new(source());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::new()),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_action_log(InMemoryActionLog::failing("disk full"))
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.orders_placed.len(), 1);
        assert!(!report.errors.is_empty());
        assert!(report.errors.iter().all(|e| e.starts_with("action log:")));
    }

    struct CorruptInventory {
        calls: AtomicU32,
    }

    impl InventorySource for CorruptInventory {
        fn fetch_items(&self) -> Result<Vec<InventoryItem>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Malformed {
                path: "inventory.json".into(),
                source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            })
        }
    }

    #[test]
    fn malformed_inventory_is_not_retried() {
        let inventory = Arc::new(CorruptInventory {
            calls: AtomicU32::new(0),
        });
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            inventory.clone(),
            Arc::new(source()),
            Arc::new(InMemoryTaskSink::new()),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_retry(RetryPolicy::exponential(3, Duration::from_secs(30), Duration::from_secs(30)));

        let report = cycle.run();
        assert_eq!(inventory.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("malformed snapshot"));
    }

    #[test]
    fn dry_run_sends_everything_for_approval() {
        let src = Arc::new(source());
        let notes = Arc::new(InMemoryNotificationSink::new());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::new()),
            notes.clone(),
        )
        .with_policy(ApprovalPolicy {
            dry_run: true,
            ..ApprovalPolicy::default()
        })
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.auto_approved, 0);
        assert!(report.orders_placed.is_empty());
        assert_eq!(report.approval_requests, 2);
        assert!(notes.all()[0].requests.iter().all(|r| r.reason == "dry_run"));
    }

    #[test]
    fn transient_inventory_failures_are_retried() {
        let src = Arc::new(source().fail_next_item_fetches(2));
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::new()),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.reorders_recommended, 2);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn persistent_inventory_failure_ends_cycle_with_error() {
        let src = Arc::new(source().fail_next_item_fetches(10));
        let tasks = Arc::new(InMemoryTaskSink::new());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            tasks.clone(),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.processed_skus, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("failed to fetch inventory"));
        assert!(tasks.all().is_empty());
    }

    #[test]
    fn offer_fetch_failure_skips_only_that_sku() {
        let src = Arc::new(source().fail_offers_for("PRICEY"));
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::new()),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.reorders_recommended, 1);
        let source_skips: Vec<_> = report
            .skipped
            .iter()
            .filter(|s| s.kind == ErrorKind::Source)
            .collect();
        assert_eq!(source_skips.len(), 1);
        assert_eq!(source_skips[0].sku.as_str(), "PRICEY");
    }

    #[test]
    fn sink_failures_are_recorded_not_fatal() {
        let src = Arc::new(source());
        let cycle = ReorderCycle::new(
            ReorderEngine::new(ReorderConfig::default()).unwrap(),
            src.clone(),
            src,
            Arc::new(InMemoryTaskSink::failing("board offline")),
            Arc::new(InMemoryNotificationSink::failing("smtp down")),
        )
        .with_retry(fast_retry());

        let report = cycle.run();
        assert_eq!(report.reorders_recommended, 2);
        assert_eq!(report.approval_batches_sent, 0);
        // two task failures + one notification failure
        assert_eq!(report.errors.len(), 3);
        assert!(!report.is_clean());
    }
}
