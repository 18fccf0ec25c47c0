use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::{
    budget::{
        aggregate::{aggregate, sum_amounts, CategoryTotals, TotalMode},
        category::CategoryBook,
        entry::{Entry, EntryType, Occurrence, Schedule},
        period::{shift_month, PeriodType},
        recurring::{expand, ExpansionMode, ScanWindow},
    },
    store::EntryStore,
};

/// Read-only projections over an [`EntryStore`]. Every query recomputes from
/// the store's current contents and its clock.
pub struct ProjectionService;

impl ProjectionService {
    /// Occurrences of `kind` that fall in the period around `reference`.
    ///
    /// [`ExpansionMode::Display`] yields one row per stored entry (at its
    /// anchor date) when at least one of its occurrences matches;
    /// [`ExpansionMode::Balance`] yields every matching occurrence.
    pub fn entries_for_period<'s>(
        store: &'s EntryStore,
        kind: EntryType,
        period: PeriodType,
        reference: NaiveDate,
        mode: ExpansionMode,
    ) -> Vec<Occurrence<'s>> {
        let window = period_window(period, reference);
        store
            .all(kind)
            .iter()
            .flat_map(|entry| occurrences_in(entry, window, period, reference, mode))
            .collect()
    }

    /// Per-category totals of the period, e.g. for a transaction table.
    pub fn totals_for_period(
        store: &EntryStore,
        kind: EntryType,
        period: PeriodType,
        reference: NaiveDate,
        mode: TotalMode,
    ) -> CategoryTotals {
        let expansion = match mode {
            TotalMode::PerOccurrence => ExpansionMode::Balance,
            TotalMode::GoalTotal => ExpansionMode::Display,
        };
        aggregate(
            Self::entries_for_period(store, kind, period, reference, expansion),
            mode,
        )
    }

    /// `income − (expense + saving)` over a forward horizon of `years`.
    ///
    /// Open-ended recurrences are extrapolated linearly (`amount × months`
    /// or `amount × years`); single entries count when dated inside
    /// `[today, today + years]`; bounded monthly recurrences count only the
    /// occurrences that remain inside the horizon, so an ended goal stops
    /// contributing.
    pub fn multi_year_balance(store: &EntryStore, years: f64) -> f64 {
        let today = store.clock().today();
        let months = (years * 12.0).round() as i32;
        let horizon = shift_month(today, months);
        let sum = |kind: EntryType| -> f64 {
            store
                .all(kind)
                .iter()
                .map(|entry| horizon_contribution(entry, today, horizon, years))
                .sum()
        };
        sum(EntryType::Income) - (sum(EntryType::Expense) + sum(EntryType::Saving))
    }

    /// Balance-mode `income − (expense + saving)` for one reference period.
    pub fn period_balance(store: &EntryStore, period: PeriodType, reference: NaiveDate) -> f64 {
        let total = |kind| {
            sum_amounts(Self::entries_for_period(
                store,
                kind,
                period,
                reference,
                ExpansionMode::Balance,
            ))
        };
        total(EntryType::Income) - (total(EntryType::Expense) + total(EntryType::Saving))
    }

    /// Occurrence amounts over the next `months`, summed per category name.
    pub fn category_shares(
        store: &EntryStore,
        categories: &CategoryBook,
        months: u32,
        fallback: &str,
    ) -> CategoryShares {
        let today = store.clock().today();
        let end = shift_month(today, months as i32);
        let window = ScanWindow { start: today, end };
        let mut shares = CategoryShares::default();
        for kind in EntryType::ALL {
            let target = match kind {
                EntryType::Income => &mut shares.incomes,
                EntryType::Expense | EntryType::Saving => &mut shares.outflows,
            };
            for entry in store.all(kind) {
                let name = categories.display_name(kind, &entry.category, fallback);
                let amount: f64 = expand(entry, window).map(|occ| occ.amount()).sum();
                if amount > 0.0 {
                    *target.entry(name.to_string()).or_insert(0.0) += amount;
                }
            }
        }
        shares
    }
}

/// Share-chart input: amounts per category display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryShares {
    pub incomes: BTreeMap<String, f64>,
    /// Expenses and savings together.
    pub outflows: BTreeMap<String, f64>,
}

impl CategoryShares {
    pub fn total_incomes(&self) -> f64 {
        self.incomes.values().sum()
    }

    pub fn total_outflows(&self) -> f64 {
        self.outflows.values().sum()
    }
}

/// Memoised [`ProjectionService::multi_year_balance`], keyed by `years` and
/// dropped whenever the store's revision or the clock's date moves.
#[derive(Debug, Default)]
pub struct BalanceCache {
    stamp: Option<(u64, NaiveDate)>,
    values: HashMap<u64, f64>,
}

impl BalanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multi_year_balance(&mut self, store: &EntryStore, years: f64) -> f64 {
        let stamp = (store.revision(), store.clock().today());
        if self.stamp != Some(stamp) {
            self.values.clear();
            self.stamp = Some(stamp);
        }
        *self
            .values
            .entry(years.to_bits())
            .or_insert_with(|| ProjectionService::multi_year_balance(store, years))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn period_window(period: PeriodType, reference: NaiveDate) -> ScanWindow {
    ScanWindow {
        start: period.period_start(reference),
        end: period.period_end(reference),
    }
}

fn occurrences_in<'s>(
    entry: &'s Entry,
    window: ScanWindow,
    period: PeriodType,
    reference: NaiveDate,
    mode: ExpansionMode,
) -> Vec<Occurrence<'s>> {
    let mut matching = expand(entry, window).filter(|occ| period.matches(occ.date, reference));
    match mode {
        ExpansionMode::Display => matching
            .next()
            .map(|_| Occurrence {
                entry,
                date: entry.date,
            })
            .into_iter()
            .collect(),
        ExpansionMode::Balance => matching.collect(),
    }
}

fn horizon_contribution(entry: &Entry, today: NaiveDate, horizon: NaiveDate, years: f64) -> f64 {
    match entry.schedule {
        Schedule::Single => {
            if entry.date >= today && entry.date <= horizon {
                entry.amount
            } else {
                0.0
            }
        }
        Schedule::Monthly { end_date: None } => entry.amount * years * 12.0,
        Schedule::Monthly { end_date: Some(_) } => {
            let window = ScanWindow {
                start: today,
                end: horizon,
            };
            let remaining = expand(entry, window).count() as f64;
            entry.amount * remaining.min(years * 12.0)
        }
        Schedule::Yearly => entry.amount * years,
    }
}
