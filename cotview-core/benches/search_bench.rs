//! Criterion benchmarks for the search hot path.
//!
//! A legacy futures year carries roughly 200 distinct markets; the index
//! is rebuilt on every load and queried on every keystroke, so both paths
//! are measured across table sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cotview_core::search::MarketSearchIndex;

// ── Helpers ──────────────────────────────────────────────────────────

const COMMODITIES: &[&str] = &[
    "WHEAT-SRW", "WHEAT-HRW", "CORN", "SOYBEANS", "CRUDE OIL", "NATURAL GAS", "GOLD", "SILVER",
    "COPPER", "COTTON", "SUGAR", "COFFEE", "LIVE CATTLE", "LEAN HOGS", "PLATINUM", "PALLADIUM",
];

const EXCHANGES: &[&str] = &[
    "CHICAGO BOARD OF TRADE",
    "NEW YORK MERCANTILE EXCHANGE",
    "COMMODITY EXCHANGE INC.",
    "ICE FUTURES U.S.",
    "CHICAGO MERCANTILE EXCHANGE",
];

fn make_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let commodity = COMMODITIES[i % COMMODITIES.len()];
            let exchange = EXCHANGES[i % EXCHANGES.len()];
            format!("{commodity} #{i} - {exchange}")
        })
        .collect()
}

// ── Index Construction ───────────────────────────────────────────────

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for &size in &[200, 1000, 5000] {
        let names = make_names(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            b.iter(|| MarketSearchIndex::new(black_box(names.iter().cloned())));
        });
    }

    group.finish();
}

// ── Query ────────────────────────────────────────────────────────────

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let index = MarketSearchIndex::new(make_names(1000));

    group.bench_function("common_fragment", |b| {
        b.iter(|| index.search(black_box("wheat")));
    });
    group.bench_function("rare_fragment", |b| {
        b.iter(|| index.search(black_box("PALLADIUM #15")));
    });
    group.bench_function("no_match", |b| {
        b.iter(|| index.search(black_box("BITCOIN")));
    });
    group.bench_function("empty_query", |b| {
        b.iter(|| index.search(black_box("")));
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
