//! Benchmarks for the explore query-string codec.
//!
//! Every filter action re-encodes the full state into the URL, and every
//! mount decodes it. Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use portal::explore::query::{decode, encode};
use portal::explore::{DateRange, FilterState, SortBy, Tab};
use portal::models::{Area, MaterialType};

fn filter_state(types: usize) -> FilterState {
    FilterState {
        search_term: "cálculo diferencial".to_string(),
        types: MaterialType::ALL.iter().copied().take(types).collect(),
        areas: vec![Area::Engineering, Area::ComputerScience],
        sort_by: SortBy::Downloads,
        date_range: DateRange::new(0, 3),
        min_downloads: 50,
        only_free: true,
        page: 4,
        active_tab: Tab::All,
        ..Default::default()
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_encode");
    for types in [0, 2, 6].iter() {
        let state = filter_state(*types);
        group.bench_with_input(BenchmarkId::from_parameter(types), &state, |b, state| {
            b.iter(|| encode(black_box(state)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_decode");
    for types in [0, 2, 6].iter() {
        let query = encode(&filter_state(*types));
        group.bench_with_input(BenchmarkId::from_parameter(types), &query, |b, query| {
            b.iter(|| decode(black_box(query)))
        });
    }
    group.finish();
}

fn bench_decode_untrusted(c: &mut Criterion) {
    let query = "q=a+b&type=NOTES,BOGUS,TCC&area=LAW&sort=zzz&years=9-1&min=x&page=-1&size=0&q=last";
    c.bench_function("query_decode_untrusted", |b| b.iter(|| decode(black_box(query))));
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_untrusted);
criterion_main!(benches);
