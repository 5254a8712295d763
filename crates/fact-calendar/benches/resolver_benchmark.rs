//! Calendar Benchmarks
//!
//! Measures performance of:
//! - Single date classification
//! - Building a month grid from a catalog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fact_calendar::{CalendarGrid, DateResolver, MonthView, Schedulable};

struct Entry {
    date: String,
    month: String,
}

impl Schedulable for Entry {
    fn date_text(&self) -> &str {
        &self.date
    }

    fn month_text(&self) -> &str {
        &self.month
    }
}

const SAMPLE_DATES: &[(&str, &str)] = &[
    ("AMC takes place on November 8th", "November"),
    ("Late October", "October"),
    ("Nov 14th", "November"),
    ("March 3-5", "March"),
    ("Rolling admissions throughout March", "March"),
    ("2nd April", "April"),
];

fn make_catalog(size: usize) -> Vec<Entry> {
    SAMPLE_DATES
        .iter()
        .cycle()
        .take(size)
        .map(|(date, month)| Entry {
            date: date.to_string(),
            month: month.to_string(),
        })
        .collect()
}

/// Benchmark classification of a single date string
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let resolver = DateResolver::new("November", "Nov");

    for (date, month) in SAMPLE_DATES {
        group.bench_with_input(BenchmarkId::from_parameter(date), date, |b, date| {
            b.iter(|| black_box(resolver.classify(black_box(date), month)))
        });
    }

    group.finish();
}

/// Benchmark grid construction
fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    let view = MonthView::new(2025, 11).expect("valid month");

    for size in [10, 100, 1000] {
        let catalog = make_catalog(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| black_box(CalendarGrid::build(catalog, view)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_grid_build);
criterion_main!(benches);
