//! Budget domain: entries, schedules, savings goals and the calendar rules
//! that expand them into dated occurrences.

pub mod aggregate;
pub mod category;
pub mod entry;
pub mod period;
pub mod recurring;
pub mod savings;

pub use aggregate::{aggregate, goal_total, CategoryTotal, CategoryTotals, TotalItem, TotalMode};
pub use category::{Category, CategoryBook};
pub use entry::{
    Entry, EntryDraft, EntryId, EntryPatch, EntryType, Frequency, Occurrence, SavingsMode,
    Schedule,
};
pub use period::{matches, period_end, PeriodType};
pub use recurring::{expand, ExpansionMode, Occurrences, ScanWindow};
pub use savings::{months_between, normalize, SavingsGoal, AVERAGE_MONTH_DAYS};
