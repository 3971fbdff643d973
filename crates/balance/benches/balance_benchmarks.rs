use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stockbook_balance::{compute_balance, compute_balances};
use stockbook_core::RecordId;
use stockbook_ledger::{Direction, MovementRecord};

const PRODUCT_COUNT: usize = 200;

fn product_names() -> Vec<String> {
    (0..PRODUCT_COUNT).map(|i| format!("Product {i:03}")).collect()
}

fn synthetic_ledger(count: usize) -> Vec<MovementRecord> {
    (0..count)
        .map(|i| MovementRecord {
            id: RecordId::new(i as i64 + 1),
            direction: if i % 3 == 0 { Direction::Outward } else { Direction::Inward },
            sequence_no: Some(i as i64),
            timestamp: Some(format!("2025-06-{:02} 10:00:00", i % 28 + 1)),
            product_name: format!("Product {:03}", i % PRODUCT_COUNT),
            pouch_batch_date: None,
            pouch_count: (i % 10) as i64,
            weight_grams: (i % 10) as f64 * 100.0,
            remarks: None,
        })
        .collect()
}

fn bench_compute_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balances");
    let names = product_names();

    for movement_count in [100, 1_000, 10_000, 100_000].iter() {
        let ledger = synthetic_ledger(*movement_count);
        group.throughput(Throughput::Elements(*movement_count as u64));
        group.bench_with_input(
            BenchmarkId::new("full_fold", movement_count),
            &ledger,
            |b, ledger| {
                b.iter(|| compute_balances(black_box(&names), black_box(ledger)));
            },
        );
    }

    group.finish();
}

fn bench_compute_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balance");
    let ledger = synthetic_ledger(10_000);

    group.bench_function("single_product_10k", |b| {
        b.iter(|| compute_balance(black_box("Product 007"), black_box(&ledger)));
    });

    group.finish();
}

criterion_group!(benches, bench_compute_all, bench_compute_one);
criterion_main!(benches);
