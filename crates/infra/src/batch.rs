//! Evaluate many items at once, isolating per-item failures.

use std::collections::HashMap;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use restock_core::{DomainResult, ErrorKind, Sku};
use restock_inventory::{InventoryItem, VendorOffer};
use restock_reorder::{ReorderEngine, ReorderPlan};

/// Vendor offers for each SKU of a snapshot.
pub type OfferBook = HashMap<Sku, Vec<VendorOffer>>;

/// An item that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSku {
    pub sku: Sku,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Plans, most urgent first.
    pub plans: Vec<ReorderPlan>,
    /// Items that failed, in input order.
    pub skipped: Vec<SkippedSku>,
    /// Items above their reorder point.
    pub not_triggered: usize,
}

impl BatchOutcome {
    fn from_results(results: impl IntoIterator<Item = (Sku, DomainResult<Option<ReorderPlan>>)>) -> Self {
        let mut outcome = BatchOutcome::default();
        for (sku, result) in results {
            match result {
                Ok(Some(plan)) => outcome.plans.push(plan),
                Ok(None) => outcome.not_triggered += 1,
                Err(e) => {
                    warn!(sku = %sku, kind = %e.kind(), error = %e, "skipping SKU");
                    outcome.skipped.push(SkippedSku {
                        sku,
                        kind: e.kind(),
                        message: e.message().to_string(),
                    });
                }
            }
        }
        sort_by_priority(&mut outcome.plans);
        outcome
    }

    pub fn evaluated(&self) -> usize {
        self.plans.len() + self.not_triggered
    }
}

/// Most urgent first; within a level, soonest stockout first. Stable.
fn sort_by_priority(plans: &mut [ReorderPlan]) {
    fn stockout(p: &ReorderPlan) -> f64 {
        p.facts.days_until_stockout.unwrap_or(f64::INFINITY)
    }
    plans.sort_by(|a, b| {
        b.urgency_level
            .cmp(&a.urgency_level)
            .then_with(|| stockout(a).total_cmp(&stockout(b)))
    });
}

fn evaluate_one(
    engine: &ReorderEngine,
    item: &InventoryItem,
    offers: &OfferBook,
) -> (Sku, DomainResult<Option<ReorderPlan>>) {
    let item_offers = offers.get(&item.sku).map(Vec::as_slice).unwrap_or(&[]);
    (item.sku.clone(), engine.evaluate(item, item_offers))
}

/// Evaluate items one after another.
pub fn evaluate_batch(engine: &ReorderEngine, items: &[InventoryItem], offers: &OfferBook) -> BatchOutcome {
    BatchOutcome::from_results(items.iter().map(|item| evaluate_one(engine, item, offers)))
}

/// Evaluate items on a pool of up to `workers` threads.
///
/// Results are collected in input order, so the outcome is identical to
/// [`evaluate_batch`] on the same input.
pub fn evaluate_batch_parallel(
    engine: &ReorderEngine,
    items: &[InventoryItem],
    offers: &OfferBook,
    workers: usize,
) -> BatchOutcome {
    let workers = workers.clamp(1, items.len().max(1));
    if workers == 1 {
        return evaluate_batch(engine, items, offers);
    }

    let pool = match ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("restock-eval-{idx}"))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(workers, error = %e, "failed to build evaluation pool; evaluating sequentially");
            return evaluate_batch(engine, items, offers);
        }
    };

    let results: Vec<(Sku, DomainResult<Option<ReorderPlan>>)> = pool.install(|| {
        items
            .par_iter()
            .map(|item| evaluate_one(engine, item, offers))
            .collect()
    });

    BatchOutcome::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use restock_core::UrgencyLevel;
    use restock_reorder::ReorderConfig;

    fn engine() -> ReorderEngine {
        ReorderEngine::new(ReorderConfig::default()).unwrap()
    }

    fn item(sku: &str, on_hand: i64) -> InventoryItem {
        InventoryItem::new(sku, on_hand, 10)
            .with_lead_time_days(3)
            .with_unit_cost(10.0)
            .with_demand_forecast(2.0)
            .with_vendor("v1")
    }

    fn book_for(items: &[InventoryItem]) -> OfferBook {
        items
            .iter()
            .map(|i| (i.sku.clone(), vec![VendorOffer::new("v1", 5.0, 0.9)]))
            .collect()
    }

    #[test]
    fn bad_item_does_not_affect_the_rest() {
        let items = vec![
            item("A", 4),
            item("B", 3).with_unit_cost(0.0), // holding cost 0
            item("C", 50),
            item("D", 0),
        ];
        let offers = book_for(&items);

        let outcome = evaluate_batch(&engine(), &items, &offers);

        assert_eq!(outcome.plans.len(), 2);
        assert_eq!(outcome.not_triggered, 1);
        assert_eq!(
            outcome.skipped,
            vec![SkippedSku {
                sku: Sku::from("B"),
                kind: ErrorKind::Configuration,
                message: "holding cost must be positive (got 0) for SKU B".to_string(),
            }]
        );
    }

    #[test]
    fn missing_offers_are_reported_not_dropped() {
        let items = vec![item("A", 4), item("NO-OFFERS", 1)];
        let mut offers = book_for(&items);
        offers.remove(&Sku::from("NO-OFFERS"));

        let outcome = evaluate_batch(&engine(), &items, &offers);
        assert_eq!(outcome.plans.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].sku.as_str(), "NO-OFFERS");
        assert_eq!(outcome.skipped[0].kind, ErrorKind::Configuration);
    }

    #[test]
    fn plans_are_ordered_by_urgency_then_stockout() {
        let items = vec![item("LOW", 8), item("MED-LATER", 4), item("HIGH", 0), item("MED-SOON", 2)];
        let outcome = evaluate_batch(&engine(), &items, &book_for(&items));
        let order: Vec<&str> = outcome.plans.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(order, vec!["HIGH", "MED-SOON", "MED-LATER", "LOW"]);
        assert_eq!(outcome.plans[0].urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn empty_batch_is_empty_outcome() {
        let outcome = evaluate_batch_parallel(&engine(), &[], &OfferBook::new(), 8);
        assert_eq!(outcome, BatchOutcome::default());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: parallel evaluation yields exactly the sequential outcome.
        #[test]
        fn parallel_matches_sequential(
            stock in prop::collection::vec((0i64..20, prop::bool::ANY), 0..40),
            workers in 1usize..8,
        ) {
            let items: Vec<InventoryItem> = stock
                .iter()
                .enumerate()
                .map(|(i, (on_hand, broken))| {
                    let it = item(&format!("SKU-{i}"), *on_hand);
                    if *broken { it.with_unit_cost(0.0) } else { it }
                })
                .collect();
            let offers = book_for(&items);

            let sequential = evaluate_batch(&engine(), &items, &offers);
            let parallel = evaluate_batch_parallel(&engine(), &items, &offers, workers);
            prop_assert_eq!(sequential, parallel);
        }
    }
}
