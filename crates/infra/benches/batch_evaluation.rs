use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use restock_infra::{OfferBook, evaluate_batch, evaluate_batch_parallel};
use restock_inventory::{InventoryItem, VendorOffer};
use restock_reorder::{ReorderConfig, ReorderEngine};

/// Synthetic snapshot: every other item is below its reorder point, each SKU
/// has four competing offers.
fn snapshot(size: usize) -> (Vec<InventoryItem>, OfferBook) {
    let mut items = Vec::with_capacity(size);
    let mut book = OfferBook::with_capacity(size);

    for i in 0..size {
        let sku = format!("SKU-{i:05}");
        let on_hand = if i % 2 == 0 { (i % 10) as i64 } else { 500 };
        let item = InventoryItem::new(sku.as_str(), on_hand, 25)
            .with_lead_time_days((i % 14) as i64)
            .with_unit_cost(5.0 + (i % 7) as f64)
            .with_demand_forecast(1.0 + (i % 5) as f64)
            .with_vendor("V1")
            .with_vendor("V2")
            .with_vendor("V3")
            .with_vendor("V4");

        let offers = (1..=4)
            .map(|v| {
                VendorOffer::new(format!("V{v}").as_str(), 4.0 + ((i + v) % 3) as f64, 0.7 + 0.05 * v as f64)
                    .with_lead_time_days(v as i64 * 2)
            })
            .collect();

        book.insert(item.sku.clone(), offers);
        items.push(item);
    }
    (items, book)
}

fn bench_sequential_vs_parallel(c: &mut Criterion) {
    let engine = ReorderEngine::new(ReorderConfig::default()).expect("default config is valid");
    let mut group = c.benchmark_group("batch_evaluation");

    for size in [100usize, 1_000, 10_000].iter() {
        let (items, book) = snapshot(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| black_box(evaluate_batch(&engine, &items, &book)));
        });

        group.bench_with_input(BenchmarkId::new("parallel_4", size), size, |b, _| {
            b.iter(|| black_box(evaluate_batch_parallel(&engine, &items, &book, 4)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequential_vs_parallel);
criterion_main!(benches);
