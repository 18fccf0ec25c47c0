//! Grouping of occurrences into per-category totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    entry::{Entry, Occurrence},
    recurring::{occurrence_count, ScanWindow},
};

/// Which meaning of "total" a caller wants for bounded savings goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalMode {
    /// Sum per-occurrence amounts; used for balances.
    PerOccurrence,
    /// Count a bounded monthly entry at `amount × occurrence count`; used when
    /// a table lists each goal once.
    GoalTotal,
}

/// A displayed row: an entry rendered at a specific date.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalItem {
    pub entry: Entry,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotal {
    pub total: f64,
    pub items: Vec<TotalItem>,
}

impl CategoryTotal {
    /// Items ordered the way tables show them: most recent date first.
    pub fn items_newest_first(&self) -> Vec<&TotalItem> {
        let mut items: Vec<&TotalItem> = self.items.iter().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items
    }
}

/// Totals keyed by category reference. Ordering carries no meaning.
pub type CategoryTotals = BTreeMap<String, CategoryTotal>;

/// Goal-style total of one stored entry: what all of its occurrences add up to.
/// Unbounded entries count once.
pub fn goal_total(entry: &Entry) -> f64 {
    match entry.end_date() {
        Some(end) => entry.total_amount.unwrap_or_else(|| {
            entry.amount * occurrence_count(entry, ScanWindow::through(end)) as f64
        }),
        None => entry.amount,
    }
}

pub fn aggregate<'a, I>(occurrences: I, mode: TotalMode) -> CategoryTotals
where
    I: IntoIterator<Item = Occurrence<'a>>,
{
    let mut totals = CategoryTotals::new();
    for occurrence in occurrences {
        let amount = match mode {
            TotalMode::PerOccurrence => occurrence.amount(),
            TotalMode::GoalTotal => goal_total(occurrence.entry),
        };
        let slot = totals.entry(occurrence.category().to_string()).or_default();
        slot.total += amount;
        slot.items.push(TotalItem {
            entry: occurrence.entry.clone(),
            date: occurrence.date,
        });
    }
    totals
}

/// Sum of every category's total.
pub fn grand_total(totals: &CategoryTotals) -> f64 {
    totals.values().map(|slot| slot.total).sum()
}

/// Sum of per-occurrence amounts without grouping.
pub fn sum_amounts<'a, I>(occurrences: I) -> f64
where
    I: IntoIterator<Item = Occurrence<'a>>,
{
    occurrences.into_iter().map(|occ| occ.amount()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{
        entry::{EntryDraft, Frequency, SavingsMode},
        recurring::expand,
        savings::{normalize, SavingsGoal},
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn groups_by_category_and_sums() {
        let rent = EntryDraft::new("3", 900.0, "2024-01-01").into_entry().unwrap();
        let food = EntryDraft::new("4", 40.0, "2024-01-05").into_entry().unwrap();
        let more_food = EntryDraft::new("4", 60.0, "2024-01-09").into_entry().unwrap();
        let occurrences = [&rent, &food, &more_food].map(|entry| Occurrence {
            entry,
            date: entry.date,
        });
        let totals = aggregate(occurrences, TotalMode::PerOccurrence);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["3"].total, 900.0);
        assert_eq!(totals["4"].total, 100.0);
        let newest = totals["4"].items_newest_first();
        assert_eq!(newest[0].date, d(2024, 1, 9));
        assert_eq!(grand_total(&totals), 1000.0);
    }

    #[test]
    fn goal_total_matches_the_sum_of_occurrences() {
        let bounded = EntryDraft::new("6", 50.0, "2024-01-01")
            .with_frequency(Frequency::Monthly)
            .with_end_date("2024-04-01")
            .into_entry()
            .unwrap();
        // January through April, end date included.
        assert_eq!(goal_total(&bounded), 200.0);

        let goal = normalize(
            &SavingsGoal {
                category: "6".into(),
                description: String::new(),
                amount: 50.0,
                target_date: d(2024, 4, 1),
                mode: SavingsMode::Monthly,
            },
            d(2024, 1, 1),
        )
        .unwrap();
        let occurrences: Vec<_> = expand(&goal, ScanWindow::through(d(2030, 1, 1))).collect();
        assert_eq!(goal_total(&goal), 150.0);
        assert_eq!(sum_amounts(occurrences.iter().copied()), goal_total(&goal));

        let per_occurrence = aggregate([occurrences[0]], TotalMode::PerOccurrence);
        let as_goal = aggregate([occurrences[0]], TotalMode::GoalTotal);
        assert_eq!(per_occurrence["6"].total, 50.0);
        assert_eq!(as_goal["6"].total, 150.0);
    }
}
