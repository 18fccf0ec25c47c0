mod common;

use budget_tracker::{
    budget::{
        aggregate, expand, goal_total, matches, period_end, EntryDraft, EntryPatch, EntryType,
        ExpansionMode, Frequency, PeriodType, ScanWindow, TotalMode,
    },
    errors::ValidationError,
    services::{BalanceCache, ProjectionService, TimelineService},
};
use common::{date, memory_env};

#[test]
fn monthly_anchor_on_the_31st_clamps_every_step() {
    let entry = EntryDraft::new("3", 900.0, "2024-01-31")
        .with_frequency(Frequency::Monthly)
        .into_entry()
        .unwrap();
    let window = ScanWindow::new(date(2024, 1, 1), date(2024, 4, 30)).unwrap();
    let dates: Vec<_> = expand(&entry, window).map(|occ| occ.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 31),
            date(2024, 2, 29),
            date(2024, 3, 31),
            date(2024, 4, 30)
        ]
    );
}

#[test]
fn savings_target_goal_normalises_to_monthly_amount() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    store
        .add(EntryType::Saving, EntryDraft::new("7", 1200.0, "2024-07-01"))
        .unwrap();
    let goal = &store.all(EntryType::Saving)[0];
    assert_eq!(goal.frequency(), Frequency::Monthly);
    assert_eq!(goal.amount, 200.0);
    assert_eq!(goal.total_amount, Some(1200.0));
    assert_eq!(goal.date, date(2024, 1, 1));
    assert_eq!(goal.end_date(), Some(date(2024, 7, 1)));
}

#[test]
fn savings_target_must_be_in_the_future() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    let result = store.add(EntryType::Saving, EntryDraft::new("7", 1200.0, "2024-01-01"));
    assert!(matches!(result, Err(ValidationError::TargetNotInFuture { .. })));
    assert!(store.all(EntryType::Saving).is_empty());
}

#[test]
fn single_yearly_income_over_three_years() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    store
        .add(
            EntryType::Income,
            EntryDraft::new("1", 1000.0, "2024-01-01").with_frequency(Frequency::Yearly),
        )
        .unwrap();
    assert_eq!(ProjectionService::multi_year_balance(&store, 3.0), 3000.0);

    let mut cache = BalanceCache::new();
    assert_eq!(cache.multi_year_balance(&store, 3.0), 3000.0);
    assert_eq!(cache.multi_year_balance(&store, 3.0), 3000.0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn deleting_twice_or_unknown_ids_is_a_no_op() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    let id = store
        .add(EntryType::Expense, EntryDraft::new("4", 30.0, "2024-01-03"))
        .unwrap()
        .id
        .unwrap();
    assert!(store.delete(id).is_some());
    let revision = store.revision();
    assert!(store.delete(id).is_none());
    assert!(store.delete(uuid::Uuid::new_v4()).is_none());
    assert_eq!(store.revision(), revision);
    assert!(store.all(EntryType::Expense).is_empty());
}

#[test]
fn updating_unknown_ids_or_with_empty_patches_is_a_no_op() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    let id = store
        .add(EntryType::Expense, EntryDraft::new("4", 30.0, "2024-01-03"))
        .unwrap()
        .id
        .unwrap();
    let revision = store.revision();

    let unknown = EntryPatch {
        amount: Some(45.0),
        ..EntryPatch::default()
    };
    assert_eq!(store.update(uuid::Uuid::new_v4(), unknown), Ok(None));
    assert_eq!(store.update(id, EntryPatch::default()), Ok(None));

    assert_eq!(store.revision(), revision);
    assert_eq!(store.get(id).unwrap().1.amount, 30.0);
}

#[test]
fn rejected_add_does_not_mutate() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    let before = store.all(EntryType::Income).len();
    let result = store.add(EntryType::Income, EntryDraft::new("1", -5.0, "2024-01-01"));
    assert_eq!(result, Err(ValidationError::NonPositiveAmount(-5.0)));
    assert_eq!(store.all(EntryType::Income).len(), before);
    assert_eq!(store.revision(), 0);
}

#[test]
fn month_matcher_boundaries() {
    let reference = date(2024, 3, 31);
    assert!(matches(date(2024, 3, 1), reference, PeriodType::Month));
    assert!(!matches(date(2024, 4, 1), reference, PeriodType::Month));
    assert!(matches(date(1999, 4, 1), reference, PeriodType::parse_lenient("weekly")));
    assert_eq!(period_end(date(2023, 2, 10), PeriodType::Month), date(2023, 2, 28));
    assert_eq!(period_end(date(2024, 2, 10), PeriodType::Month), date(2024, 2, 29));
    assert_eq!(period_end(date(2024, 2, 10), PeriodType::Year), date(2024, 12, 31));
}

#[test]
fn display_returns_one_row_where_balance_returns_five() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    store
        .add(
            EntryType::Expense,
            EntryDraft::new("3", 100.0, "2024-08-01").with_frequency(Frequency::Monthly),
        )
        .unwrap();
    // August through December: five occurrences inside 2024.
    let reference = date(2024, 6, 1);
    let display = ProjectionService::entries_for_period(
        &store,
        EntryType::Expense,
        PeriodType::Year,
        reference,
        ExpansionMode::Display,
    );
    let balance = ProjectionService::entries_for_period(
        &store,
        EntryType::Expense,
        PeriodType::Year,
        reference,
        ExpansionMode::Balance,
    );
    assert_eq!(display.len(), 1);
    assert_eq!(balance.len(), 5);

    let totals = aggregate(balance, TotalMode::PerOccurrence);
    assert_eq!(totals["3"].total, 500.0);
}

#[test]
fn timeline_and_period_queries_agree_on_bounded_goals() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    store
        .add(
            EntryType::Saving,
            EntryDraft::new("6", 100.0, "2024-03-01").with_frequency(Frequency::Monthly),
        )
        .unwrap();
    let timeline = TimelineService::period_buckets(&store, 12);
    let saved: f64 = timeline.buckets.iter().map(|bucket| bucket.savings).sum();
    let in_year: f64 = ProjectionService::entries_for_period(
        &store,
        EntryType::Saving,
        PeriodType::Year,
        date(2024, 1, 1),
        ExpansionMode::Balance,
    )
    .iter()
    .map(|occ| occ.amount())
    .sum();
    assert_eq!(saved, in_year);
    assert_eq!(ProjectionService::multi_year_balance(&store, 1.0), -in_year);
}

#[test]
fn goal_occurrences_add_up_to_the_goal_total() {
    let (_, mut store, _) = memory_env(date(2024, 1, 1));
    store
        .add(EntryType::Saving, EntryDraft::new("7", 1200.0, "2024-07-01"))
        .unwrap();
    let goal = store.all(EntryType::Saving)[0].clone();

    let projected: f64 = ProjectionService::entries_for_period(
        &store,
        EntryType::Saving,
        PeriodType::All,
        date(2024, 1, 1),
        ExpansionMode::Balance,
    )
    .iter()
    .map(|occ| occ.amount())
    .sum();
    let timeline: f64 = TimelineService::period_buckets(&store, 12)
        .buckets
        .iter()
        .map(|bucket| bucket.savings)
        .sum();

    assert_eq!(goal_total(&goal), 1200.0);
    assert_eq!(projected, 1200.0);
    assert_eq!(timeline, 1200.0);
    assert_eq!(ProjectionService::multi_year_balance(&store, 1.0), -1200.0);
}
