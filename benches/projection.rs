use std::sync::Arc;

use budget_tracker::{
    budget::{EntryDraft, EntryType, ExpansionMode, Frequency, PeriodType},
    clock::FixedClock,
    services::{ProjectionService, TimelineService},
    storage::MemoryStore,
    store::{BudgetDocument, EntryStore},
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_sample_store(entry_count: usize) -> EntryStore {
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut document = BudgetDocument::default();
    let mut store = EntryStore::new(Arc::new(MemoryStore::new()), Arc::new(FixedClock(today)));
    for idx in 0..entry_count {
        let kind = EntryType::ALL[idx % 3];
        let day = 1 + (idx % 28) as u32;
        let year = 2020 + (idx % 5) as i32;
        let date = NaiveDate::from_ymd_opt(year, 1 + (idx % 12) as u32, day).unwrap();
        let draft = match kind {
            EntryType::Saving => EntryDraft::new("6", 1200.0, "2027-06-30"),
            _ => EntryDraft::new("1", 50.0 + (idx % 100) as f64, date.to_string()).with_frequency(
                if idx % 4 == 0 {
                    Frequency::Yearly
                } else {
                    Frequency::Monthly
                },
            ),
        };
        let entry = store.prepare(kind, draft).expect("valid sample entry");
        document.push(kind, entry);
    }
    store.replace_all(document);
    store
}

fn bench_projection(c: &mut Criterion) {
    let store = build_sample_store(black_box(3_000));
    let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("entries_for_month_balance_3k", |b| {
        b.iter(|| {
            let rows = ProjectionService::entries_for_period(
                &store,
                EntryType::Expense,
                PeriodType::Month,
                black_box(reference),
                ExpansionMode::Balance,
            );
            black_box(rows.len());
        })
    });

    c.bench_function("multi_year_balance_3k", |b| {
        b.iter(|| black_box(ProjectionService::multi_year_balance(&store, black_box(5.0))))
    });

    c.bench_function("timeline_24_months_3k", |b| {
        b.iter(|| black_box(TimelineService::period_buckets(&store, black_box(24))))
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
