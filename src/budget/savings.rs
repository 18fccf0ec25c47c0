//! Normalisation of savings goals into bounded monthly recurrences.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::ValidationError;

use super::entry::{Entry, EntryDraft, SavingsMode, Schedule};

/// Average month length used to count the months until a goal's target date.
/// Kept fixed so exported totals stay numerically identical across versions.
pub const AVERAGE_MONTH_DAYS: f64 = 30.44;

/// Raw savings goal as entered by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsGoal {
    pub category: String,
    pub description: String,
    /// Goal total for [`SavingsMode::Target`], monthly amount for [`SavingsMode::Monthly`].
    pub amount: f64,
    pub target_date: NaiveDate,
    pub mode: SavingsMode,
}

impl SavingsGoal {
    /// Reads a goal out of a generic draft; the draft's date is the target date
    /// and its frequency picks the mode.
    pub fn from_draft(draft: &EntryDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            category: draft.category.trim().to_string(),
            description: draft.description.clone(),
            amount: draft.amount,
            target_date: draft.parsed_date()?,
            mode: SavingsMode::from_frequency(draft.frequency)?,
        })
    }
}

/// Months between two dates, rounded up, never less than one.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() as f64;
    let months = (days / AVERAGE_MONTH_DAYS).ceil();
    if months.is_finite() && months > 1.0 {
        months as u32
    } else {
        1
    }
}

/// Number of monthly installments of a savings goal; `None` for any other entry.
pub fn installments(entry: &Entry) -> Option<u32> {
    match (entry.total_amount, entry.end_date()) {
        (Some(_), Some(end)) => Some(months_between(entry.date, end)),
        _ => None,
    }
}

/// Converts a goal into a monthly entry running from `today` to the target date.
pub fn normalize(goal: &SavingsGoal, today: NaiveDate) -> Result<Entry, ValidationError> {
    if goal.target_date <= today {
        return Err(ValidationError::TargetNotInFuture {
            target: goal.target_date,
            today,
        });
    }
    if !(goal.amount.is_finite() && goal.amount > 0.0) {
        return Err(ValidationError::NonPositiveAmount(goal.amount));
    }
    let months = f64::from(months_between(today, goal.target_date));
    let (amount, total_amount) = match goal.mode {
        SavingsMode::Target => (goal.amount / months, goal.amount),
        SavingsMode::Monthly => (goal.amount, goal.amount * months),
    };
    let entry = Entry {
        id: Uuid::new_v4(),
        category: goal.category.clone(),
        description: goal.description.clone(),
        amount,
        date: today,
        schedule: Schedule::Monthly {
            end_date: Some(goal.target_date),
        },
        total_amount: Some(total_amount),
        original_frequency: Some(goal.mode),
    };
    entry.validate()?;
    Ok(entry)
}

/// Which side of a goal an edit pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalEdit {
    /// The total was set explicitly; derive the monthly amount.
    Total,
    /// The monthly amount was set explicitly; derive the total.
    Amount,
    /// Only the dates moved; keep the total and derive the monthly amount.
    Dates,
}

/// Re-derives `amount`/`total_amount` of an edited goal so that
/// `total_amount == amount × months` keeps holding.
pub fn resync_goal(entry: &mut Entry, edit: GoalEdit) {
    let Some(end) = entry.end_date() else {
        return;
    };
    let months = f64::from(months_between(entry.date, end));
    match edit {
        GoalEdit::Total | GoalEdit::Dates => {
            if let Some(total) = entry.total_amount {
                entry.amount = total / months;
            }
        }
        GoalEdit::Amount => entry.total_amount = Some(entry.amount * months),
    }
}
