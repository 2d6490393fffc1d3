//! Criterion benchmarks for dataset indexing and search
//!
//! These benchmarks measure:
//! - Index build time over a synthetic dataset
//! - Unfiltered search (full scan plus sort)
//! - Indexed category/situation filters
//! - Deep pagination

use cda_api::models::CdaRecord;
use cda_api::search::{search, CategoricalIndex, SearchQuery, SortField, SortOrder};
use cda_api::state::RecordStore;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const CATEGORIES: [&str; 6] = ["IPTU", "ISS", "Taxas", "Multas", "ITBI", "Outros"];

fn synthetic_records(count: u32) -> Vec<CdaRecord> {
    (0..count)
        .map(|i| CdaRecord {
            num_cda: format!("{}/{:08}", 2000 + i % 25, i),
            score: f64::from(i.wrapping_mul(2_654_435_761) % 1000) / 1000.0,
            balance: f64::from(i.wrapping_mul(40_503) % 1_000_000) / 100.0,
            age_years: i % 30,
            status_code: i64::from(i % 3) - 1,
            category: CATEGORIES[(i as usize) % CATEGORIES.len()].to_string(),
        })
        .collect()
}

/// Benchmark categorical index construction
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [10_000u32, 100_000] {
        let records = synthetic_records(size);
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| CategoricalIndex::build(black_box(records)));
        });
    }

    group.finish();
}

/// Benchmark representative search shapes
fn bench_search(c: &mut Criterion) {
    let store = RecordStore::from_records(synthetic_records(100_000)).unwrap();
    let index = CategoricalIndex::build(store.records());

    let queries = [
        ("unfiltered", SearchQuery::new()),
        (
            "category",
            SearchQuery::new().with_categories(vec!["IPTU", "ISS"]),
        ),
        (
            "category_and_situation",
            SearchQuery::new()
                .with_categories(vec!["IPTU"])
                .with_situations(vec!["Em cobrança"]),
        ),
        (
            "substring_and_ranges",
            SearchQuery::new()
                .with_text("2010/")
                .with_balance(Some(1000.0), Some(5000.0))
                .with_score(Some(0.25), None),
        ),
        (
            "deep_page_by_score",
            SearchQuery::new()
                .with_sort(SortField::Score, SortOrder::Ascending)
                .with_page(150, 500),
        ),
        (
            "unsatisfiable",
            SearchQuery::new().with_situations(vec!["not-a-real-label"]),
        ),
    ];

    let mut group = c.benchmark_group("search");
    for (name, query) in queries.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| search(&store, &index, black_box(query)).total);
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build, bench_search);
criterion_main!(benches);
