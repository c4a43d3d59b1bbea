//! Background thread repeating reorder cycles on a schedule.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::cycle::{CycleReport, ReorderCycle};
use crate::sinks::{NotificationSink, TaskSink};
use crate::sources::{InventorySource, VendorOfferSource};

/// Schedule for the reorder runner.
#[derive(Debug, Clone)]
pub struct ReorderRunner {
    pub interval: Duration,
}

impl Default for ReorderRunner {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Default)]
struct RunnerState {
    last_report: Option<CycleReport>,
    cycles_completed: u64,
}

/// Handle for the running reorder runner (shutdown + trigger hook).
#[derive(Debug)]
pub struct ReorderRunnerHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    state: Arc<Mutex<RunnerState>>,
    join: Option<thread::JoinHandle<()>>,
}

impl ReorderRunnerHandle {
    /// Request a cycle as soon as possible (e.g. after an inventory webhook).
    ///
    /// Triggers are coalesced: if a cycle is already pending this is a no-op.
    pub fn trigger(&self) {
        let _ = self.trigger.try_send(());
    }

    pub fn last_report(&self) -> Option<CycleReport> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_report
            .clone()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).cycles_completed
    }

    /// Gracefully stop the runner thread.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Block until the runner thread exits.
    pub fn wait(mut self) {
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

impl ReorderRunner {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Spawn the runner thread.
    ///
    /// - Schedule: runs once at startup, then every `interval`
    /// - Event-trigger: call `handle.trigger()` to run early
    /// - Failures: reported inside each `CycleReport`; never stop the runner
    pub fn spawn<I, O, T, N>(
        &self,
        name: &str,
        cycle: Arc<ReorderCycle<I, O, T, N>>,
    ) -> std::io::Result<ReorderRunnerHandle>
    where
        I: InventorySource,
        O: VendorOfferSource,
        T: TaskSink,
        N: NotificationSink,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);
        let state = Arc::new(Mutex::new(RunnerState::default()));

        let interval = self.interval;
        let thread_state = state.clone();
        let thread_name = name.to_string();
        let join = thread::Builder::new().name(name.to_string()).spawn(move || {
            runner_loop(&thread_name, interval, cycle, shutdown_rx, trigger_rx, thread_state)
        })?;

        Ok(ReorderRunnerHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            state,
            join: Some(join),
        })
    }
}

fn runner_loop<I, O, T, N>(
    name: &str,
    interval: Duration,
    cycle: Arc<ReorderCycle<I, O, T, N>>,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    state: Arc<Mutex<RunnerState>>,
) where
    I: InventorySource,
    O: VendorOfferSource,
    T: TaskSink,
    N: NotificationSink,
{
    info!(runner = name, interval_secs = interval.as_secs(), "reorder runner started");

    let mut next_tick = Instant::now() + interval;
    let mut pending = true; // run once on startup

    loop {
        // Shutdown has priority.
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        let now = Instant::now();
        if now >= next_tick {
            pending = true;
            // Keep a stable cadence even if a cycle overran.
            while next_tick <= now {
                next_tick += interval;
            }
        }

        // Coalesce any number of triggers into one run.
        while trigger_rx.try_recv().is_ok() {
            pending = true;
        }

        if !pending {
            let sleep_for = next_tick
                .saturating_duration_since(Instant::now())
                .min(Duration::from_millis(250));
            thread::sleep(sleep_for);
            continue;
        }

        pending = false;
        let report = cycle.run();

        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
        guard.cycles_completed += 1;
        guard.last_report = Some(report);
    }

    info!(runner = name, "reorder runner stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use restock_core::Sku;
    use restock_inventory::{InventoryItem, VendorOffer};
    use restock_reorder::{ReorderConfig, ReorderEngine};

    use crate::retry::RetryPolicy;
    use crate::sinks::{InMemoryNotificationSink, InMemoryTaskSink};
    use crate::sources::InMemorySource;

    fn cycle(
        tasks: Arc<InMemoryTaskSink>,
    ) -> Arc<ReorderCycle<InMemorySource, InMemorySource, InMemoryTaskSink, InMemoryNotificationSink>> {
        let item = InventoryItem::new("SKU-R", 1, 10)
            .with_unit_cost(2.0)
            .with_demand_forecast(1.0)
            .with_vendor("v1");
        let mut offers = HashMap::new();
        offers.insert(Sku::from("SKU-R"), vec![VendorOffer::new("v1", 1.0, 0.9)]);
        let src = Arc::new(InMemorySource::from_parts(vec![item], offers));
        Arc::new(
            ReorderCycle::new(
                ReorderEngine::new(ReorderConfig::default()).unwrap(),
                src.clone(),
                src,
                tasks,
                Arc::new(InMemoryNotificationSink::new()),
            )
            .with_retry(RetryPolicy::no_retry()),
        )
    }

    fn wait_for(handle: &ReorderRunnerHandle, cycles: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while handle.cycles_completed() < cycles {
            assert!(Instant::now() < deadline, "runner did not complete {cycles} cycle(s) in time");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn runs_once_on_startup_and_on_trigger() {
        let tasks = Arc::new(InMemoryTaskSink::new());
        let handle = ReorderRunner::new(Duration::from_secs(3600))
            .spawn("reorder-test", cycle(tasks.clone()))
            .unwrap();

        wait_for(&handle, 1);
        assert_eq!(handle.last_report().unwrap().reorders_recommended, 1);

        handle.trigger();
        wait_for(&handle, 2);
        assert_eq!(tasks.get(&Sku::from("SKU-R")).unwrap().revisions, 2);

        handle.shutdown();
    }

    #[test]
    fn short_interval_keeps_running() {
        let tasks = Arc::new(InMemoryTaskSink::new());
        let handle = ReorderRunner::new(Duration::from_millis(20))
            .spawn("reorder-interval-test", cycle(tasks))
            .unwrap();

        wait_for(&handle, 3);
        handle.shutdown();
    }
}
