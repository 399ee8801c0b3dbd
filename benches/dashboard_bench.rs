use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sales_dashboard::api::{BubbleChartOptions, BubbleChartScene, ColumnChartOptions, ColumnChartScene};
use sales_dashboard::core::{
    CategorySet, GroupedTable, PerturbationRange, SalesDataset, SalesRecord, Viewport,
    perturb_records,
};
use sales_dashboard::interaction::BubbleHoverState;
use std::hint::black_box;
use std::time::Duration;

const PRODUCTS: [&str; 3] = ["Smartphone A", "Smartphone B", "Tablet X"];
const PERIODS: [&str; 2] = ["Enero", "Febrero"];

fn generated_records(count: usize) -> Vec<SalesRecord> {
    (0..count)
        .map(|i| {
            let units = 10 + (i as u64 * 37) % 500;
            let price = 100.0 + (i % 7) as f64 * 50.0;
            SalesRecord::new(
                PRODUCTS[i % PRODUCTS.len()],
                PERIODS[(i / PRODUCTS.len()) % PERIODS.len()],
                units,
                units as f64 * price,
                price,
            )
        })
        .collect()
}

fn bench_grouped_table_10k(c: &mut Criterion) {
    let dataset = SalesDataset::new(generated_records(10_000)).expect("valid dataset");
    let categories = CategorySet::default();

    c.bench_function("grouped_table_10k", |b| {
        b.iter(|| {
            let _ = GroupedTable::build(black_box(&dataset), black_box(&categories));
        })
    });
}

fn bench_perturb_10k(c: &mut Criterion) {
    let records = generated_records(10_000);
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("perturb_records_10k", |b| {
        b.iter(|| {
            let _ = perturb_records(
                black_box(&records),
                PerturbationRange::default(),
                &mut rng,
            );
        })
    });
}

fn bench_chart_frames_2k(c: &mut Criterion) {
    let dataset = SalesDataset::new(generated_records(2_000)).expect("valid dataset");
    let categories = CategorySet::default();
    let column_options = ColumnChartOptions::default();
    let bubble_options = BubbleChartOptions::default();
    let hover = BubbleHoverState::default();

    c.bench_function("column_chart_scene_2k", |b| {
        b.iter(|| {
            let _ = ColumnChartScene::build(
                black_box(&dataset),
                Viewport::new(1200, 400),
                &column_options,
                &categories,
            )
            .expect("column scene");
        })
    });

    c.bench_function("bubble_chart_frame_2k", |b| {
        b.iter(|| {
            let scene = BubbleChartScene::build(
                black_box(&dataset),
                Viewport::new(1200, 720),
                &bubble_options,
                &categories,
            )
            .expect("bubble scene");
            let _ = scene
                .frame_at(&hover, Duration::from_millis(400))
                .expect("bubble frame");
        })
    });
}

criterion_group!(
    benches,
    bench_grouped_table_10k,
    bench_perturb_10k,
    bench_chart_frames_2k
);
criterion_main!(benches);
