//! Expansion of stored entries into dated occurrences.

use chrono::NaiveDate;

use crate::errors::ValidationError;

use super::{
    entry::{Entry, Occurrence, Schedule},
    period::{try_shift_month, try_shift_year},
    savings::installments,
};

/// Inclusive `[start, end]` range occurrences are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScanWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Everything up to and including `end`.
    pub fn through(end: NaiveDate) -> Self {
        Self {
            start: NaiveDate::MIN,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Whether a projection should list stored entries or every occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionMode {
    /// One row per stored entry, keeping its anchor date.
    Display,
    /// One row per generated occurrence.
    Balance,
}

impl ExpansionMode {
    pub fn for_balance(for_balance: bool) -> Self {
        if for_balance {
            ExpansionMode::Balance
        } else {
            ExpansionMode::Display
        }
    }
}

/// Lazy sequence of occurrence dates for one entry.
///
/// Step `n` is always derived from the anchor date (anchor + n months/years)
/// so a day clamped in a short month never drifts the following steps.
///
/// Savings goals stop after their installment count; an installment that
/// would land past the target date falls on the target date instead, so
/// the installments always add up to the goal total.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    entry: &'a Entry,
    window: ScanWindow,
    limit: NaiveDate,
    max_steps: Option<i32>,
    step: i32,
    done: bool,
}

impl<'a> Occurrences<'a> {
    fn new(entry: &'a Entry, window: ScanWindow) -> Self {
        let limit = match entry.end_date() {
            Some(end) => end.min(window.end),
            None => window.end,
        };
        Self {
            entry,
            window,
            limit,
            max_steps: installments(entry).and_then(|count| i32::try_from(count).ok()),
            step: 0,
            done: false,
        }
    }

    fn date_at(&self, step: i32) -> Option<NaiveDate> {
        match self.entry.schedule {
            Schedule::Single => (step == 0).then_some(self.entry.date),
            Schedule::Monthly { end_date } => {
                let date = try_shift_month(self.entry.date, step)?;
                match (self.max_steps, end_date) {
                    (Some(_), Some(end)) => Some(date.min(end)),
                    _ => Some(date),
                }
            }
            Schedule::Yearly => try_shift_year(self.entry.date, step),
        }
    }
}

impl<'a> Iterator for Occurrences<'a> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.max_steps.is_some_and(|max| self.step >= max) {
                self.done = true;
                break;
            }
            let Some(date) = self.date_at(self.step) else {
                self.done = true;
                break;
            };
            if date > self.limit {
                self.done = true;
                break;
            }
            self.step += 1;
            if date >= self.window.start {
                return Some(Occurrence {
                    entry: self.entry,
                    date,
                });
            }
        }
        None
    }
}

/// Expands `entry` into its occurrences inside `window`.
pub fn expand(entry: &Entry, window: ScanWindow) -> Occurrences<'_> {
    Occurrences::new(entry, window)
}

/// Number of occurrences `entry` produces inside `window`.
pub fn occurrence_count(entry: &Entry, window: ScanWindow) -> usize {
    expand(entry, window).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{
        entry::{EntryDraft, Frequency, SavingsMode},
        savings::{normalize, SavingsGoal},
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly(date: &str) -> Entry {
        EntryDraft::new("1", 100.0, date)
            .with_frequency(Frequency::Monthly)
            .into_entry()
            .unwrap()
    }

    fn dates(entry: &Entry, window: ScanWindow) -> Vec<NaiveDate> {
        expand(entry, window).map(|occ| occ.date).collect()
    }

    #[test]
    fn monthly_anchor_on_31st_clamps_without_drifting() {
        let entry = monthly("2024-01-31");
        let window = ScanWindow::new(d(2024, 1, 1), d(2024, 4, 30)).unwrap();
        assert_eq!(
            dates(&entry, window),
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
        );
    }

    #[test]
    fn monthly_respects_end_date_inclusively() {
        let entry = EntryDraft::new("1", 50.0, "2024-01-15")
            .with_frequency(Frequency::Monthly)
            .with_end_date("2024-04-15")
            .into_entry()
            .unwrap();
        let window = ScanWindow::through(d(2030, 1, 1));
        assert_eq!(dates(&entry, window).len(), 4);
        assert_eq!(dates(&entry, window).last(), Some(&d(2024, 4, 15)));
    }

    #[test]
    fn goal_installments_match_the_goal_total() {
        let goal = normalize(
            &SavingsGoal {
                category: "7".into(),
                description: String::new(),
                amount: 1200.0,
                target_date: d(2024, 7, 1),
                mode: SavingsMode::Target,
            },
            d(2024, 1, 1),
        )
        .unwrap();
        let all = dates(&goal, ScanWindow::through(d(2030, 1, 1)));
        assert_eq!(all.len(), 6);
        assert_eq!(all.last(), Some(&d(2024, 6, 1)));
        let saved: f64 = expand(&goal, ScanWindow::through(d(2030, 1, 1)))
            .map(|occ| occ.amount())
            .sum();
        assert_eq!(saved, 1200.0);
    }

    #[test]
    fn late_goal_installment_lands_on_the_target_date() {
        // 61 days round up to three installments, but only two calendar
        // months start before the target.
        let goal = normalize(
            &SavingsGoal {
                category: "7".into(),
                description: String::new(),
                amount: 300.0,
                target_date: d(2024, 8, 31),
                mode: SavingsMode::Target,
            },
            d(2024, 7, 1),
        )
        .unwrap();
        assert_eq!(goal.total_amount, Some(300.0));
        let window = ScanWindow::through(d(2030, 1, 1));
        assert_eq!(
            dates(&goal, window),
            vec![d(2024, 7, 1), d(2024, 8, 1), d(2024, 8, 31)]
        );
        let saved: f64 = expand(&goal, window).map(|occ| occ.amount()).sum();
        assert!((saved - 300.0).abs() < 1e-9);
    }

    #[test]
    fn single_occurs_only_inside_window() {
        let entry = EntryDraft::new("1", 10.0, "2024-05-05").into_entry().unwrap();
        let inside = ScanWindow::new(d(2024, 5, 1), d(2024, 5, 31)).unwrap();
        let outside = ScanWindow::new(d(2024, 6, 1), d(2024, 6, 30)).unwrap();
        assert_eq!(dates(&entry, inside), vec![d(2024, 5, 5)]);
        assert!(dates(&entry, outside).is_empty());
    }

    #[test]
    fn yearly_leap_day_anchor() {
        let entry = EntryDraft::new("1", 10.0, "2024-02-29")
            .with_frequency(Frequency::Yearly)
            .into_entry()
            .unwrap();
        let window = ScanWindow::through(d(2028, 12, 31));
        assert_eq!(
            dates(&entry, window),
            vec![d(2024, 2, 29), d(2025, 2, 28), d(2026, 2, 28), d(2027, 2, 28), d(2028, 2, 29)]
        );
    }

    #[test]
    fn occurrences_before_window_start_are_skipped() {
        let entry = monthly("2024-01-10");
        let window = ScanWindow::new(d(2024, 3, 1), d(2024, 5, 31)).unwrap();
        assert_eq!(
            dates(&entry, window),
            vec![d(2024, 3, 10), d(2024, 4, 10), d(2024, 5, 10)]
        );
    }

    #[test]
    fn anchor_after_window_yields_nothing() {
        let entry = monthly("2025-01-10");
        assert_eq!(occurrence_count(&entry, ScanWindow::through(d(2024, 12, 31))), 0);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(ScanWindow::new(d(2024, 2, 1), d(2024, 1, 1)).is_err());
    }
}
