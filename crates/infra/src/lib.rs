//! Infrastructure layer: collaborators, batching, cycles, background runner.
//!
//! Everything here surrounds the pure reorder engine. Collaborators are traits
//! with in-memory, file and log-backed adapters; real spreadsheet, task board,
//! supplier and email clients plug in behind the same traits.

pub mod approval;
pub mod audit;
pub mod batch;
pub mod cycle;
pub mod orders;
pub mod retry;
pub mod runner;
pub mod sinks;
pub mod sources;

pub use approval::{ApprovalBatch, ApprovalPolicy, ApprovalRequest, Disposition, route};
pub use audit::{Action, ActionLog, ActionRecord, ActionStatus, InMemoryActionLog, JsonLinesActionLog, LogActionLog};
pub use batch::{BatchOutcome, OfferBook, SkippedSku, evaluate_batch, evaluate_batch_parallel};
pub use cycle::{CycleReport, ReorderCycle};
pub use orders::{InMemoryOrderSink, LogOrderSink, OrderError, OrderId, OrderSink, PlacedOrder, PurchaseOrder};
pub use retry::RetryPolicy;
pub use runner::{ReorderRunner, ReorderRunnerHandle};
pub use sinks::{
    InMemoryNotificationSink, InMemoryTaskSink, LogNotificationSink, LogTaskSink, NotificationSink,
    SinkError, TaskRecord, TaskRef, TaskSink,
};
pub use sources::{
    InMemorySource, InventorySource, JsonFileSource, Snapshot, SourceError, VendorOfferSource,
};
