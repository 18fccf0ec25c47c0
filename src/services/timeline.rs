use chrono::{Datelike, NaiveDate};

use crate::{
    budget::{
        aggregate::sum_amounts,
        entry::EntryType,
        period::{shift_month, PeriodType},
        recurring::ExpansionMode,
    },
    store::EntryStore,
};

use super::projection::ProjectionService;

/// Width of one timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Quarterly,
    Biannual,
    Yearly,
}

impl Granularity {
    /// Picks the bucket width for a chart spanning `scale_months`.
    pub fn for_scale(scale_months: u32) -> Self {
        match scale_months {
            0..=24 => Granularity::Monthly,
            25..=36 => Granularity::Quarterly,
            37..=60 => Granularity::Biannual,
            _ => Granularity::Yearly,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Granularity::Monthly => 1,
            Granularity::Quarterly => 3,
            Granularity::Biannual => 6,
            Granularity::Yearly => 12,
        }
    }

    /// Whether a month opens a new bucket.
    fn starts_bucket(&self, date: NaiveDate) -> bool {
        date.month0() % self.months() == 0
    }

    /// First day of the bucket containing `date`.
    fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        let month0 = date.month0() - date.month0() % self.months();
        NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or(date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBucket {
    /// Today shifted by the month offset that produced the bucket.
    pub date: NaiveDate,
    pub start: NaiveDate,
    pub incomes: f64,
    pub expenses: f64,
    pub savings: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub granularity: Granularity,
    pub buckets: Vec<TimelineBucket>,
}

impl Timeline {
    pub fn total_balance(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.balance).sum()
    }
}

pub struct TimelineService;

impl TimelineService {
    /// Buckets of balance-mode totals from today across `scale_months`.
    pub fn period_buckets(store: &EntryStore, scale_months: u32) -> Timeline {
        let granularity = Granularity::for_scale(scale_months);
        let today = store.clock().today();
        let mut buckets = Vec::new();
        for offset in 0..=scale_months {
            let date = shift_month(today, offset as i32);
            if granularity != Granularity::Monthly && !granularity.starts_bucket(date) {
                continue;
            }
            buckets.push(Self::bucket(store, granularity, date));
        }
        Timeline {
            granularity,
            buckets,
        }
    }

    fn bucket(store: &EntryStore, granularity: Granularity, date: NaiveDate) -> TimelineBucket {
        let start = match granularity {
            Granularity::Monthly => date,
            _ => granularity.bucket_start(date),
        };
        let month_total = |kind: EntryType, month: NaiveDate| {
            sum_amounts(ProjectionService::entries_for_period(
                store,
                kind,
                PeriodType::Month,
                month,
                ExpansionMode::Balance,
            ))
        };
        let (mut incomes, mut expenses, mut savings) = (0.0, 0.0, 0.0);
        for step in 0..granularity.months() {
            let month = shift_month(start, step as i32);
            incomes += month_total(EntryType::Income, month);
            expenses += month_total(EntryType::Expense, month);
            savings += month_total(EntryType::Saving, month);
        }
        TimelineBucket {
            date,
            start: start.with_day(1).unwrap_or(start),
            incomes,
            expenses,
            savings,
            balance: incomes - (expenses + savings),
        }
    }
}
