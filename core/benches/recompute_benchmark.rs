/// Chart recompute benchmarks using Criterion
///
/// Run with: cargo bench --bench recompute_benchmark
///
/// Benchmarks cover:
/// - Pie recompute in both aggregation modes
/// - Scatter recompute (payload filter + site filter)
/// - Full controller transition on a site change
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use launchdash_core::controller::{pie_chart, scatter_chart};
use launchdash_core::{
    ChartController, ControlEvent, Dataset, LaunchRecord, OutcomeClass, PayloadRange,
    SiteSelection,
};
use std::sync::Arc;

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];
const CATEGORIES: [&str; 5] = ["v1.0", "v1.1", "FT", "B4", "B5"];

fn make_dataset(rows: usize) -> Arc<Dataset> {
    let records = (0..rows)
        .map(|i| {
            let payload = if i % 17 == 0 {
                None
            } else {
                Some((i * 37 % 10_000) as f64)
            };
            let outcome = if i % 3 == 0 {
                OutcomeClass::Failure
            } else {
                OutcomeClass::Success
            };
            LaunchRecord::new(
                SITES[i % SITES.len()],
                payload,
                CATEGORIES[i % CATEGORIES.len()],
                outcome,
            )
        })
        .collect();
    Arc::new(Dataset::from_records(records).unwrap())
}

fn bench_pie(c: &mut Criterion) {
    let mut group = c.benchmark_group("pie_recompute");
    let site = SiteSelection::site(SITES[2]);

    for rows in [100usize, 1_000, 10_000].iter() {
        let ds = make_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("all_sites", rows), &ds, |b, ds| {
            b.iter(|| black_box(pie_chart(ds, &SiteSelection::All)))
        });
        group.bench_with_input(BenchmarkId::new("single_site", rows), &ds, |b, ds| {
            b.iter(|| black_box(pie_chart(ds, &site)))
        });
    }

    group.finish();
}

fn bench_scatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter_recompute");
    let range = PayloadRange::new(2_000.0, 8_000.0);
    let site = SiteSelection::site(SITES[0]);

    for rows in [100usize, 1_000, 10_000].iter() {
        let ds = make_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &ds, |b, ds| {
            b.iter(|| black_box(scatter_chart(ds, &site, range)))
        });
    }

    group.finish();
}

fn bench_controller_transition(c: &mut Criterion) {
    let mut controller = ChartController::new(make_dataset(1_000));
    let mut flip = false;

    c.bench_function("controller_site_change_1000_rows", |b| {
        b.iter(|| {
            flip = !flip;
            let site = if flip {
                SiteSelection::site(SITES[1])
            } else {
                SiteSelection::All
            };
            black_box(controller.apply(ControlEvent::Site(site)))
        })
    });
}

criterion_group!(
    benches,
    bench_pie,
    bench_scatter,
    bench_controller_transition
);
criterion_main!(benches);
