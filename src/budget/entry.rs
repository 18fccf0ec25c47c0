use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

use super::period::parse_iso_date;

/// Stable identity of a stored entry.
pub type EntryId = Uuid;

/// Bucket an entry lives in. Never changes after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
    Saving,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::Income, EntryType::Expense, EntryType::Saving];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
            EntryType::Saving => "saving",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            "saving" | "savings" => Ok(EntryType::Saving),
            other => Err(ValidationError::UnknownEntryType(other.to_string())),
        }
    }
}

/// Cadence label as users and interchange files spell it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Single,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Single => "single",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "single" => Ok(Frequency::Single),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(ValidationError::UnknownFrequency(other.to_string())),
        }
    }
}

/// How an entry recurs. Only monthly recurrences may be bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    #[default]
    Single,
    Monthly { end_date: Option<NaiveDate> },
    Yearly,
}

impl Schedule {
    /// Combines a frequency label with an optional end date, rejecting
    /// combinations that cannot be represented.
    pub fn from_parts(
        frequency: Frequency,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        match (frequency, end_date) {
            (Frequency::Single, None) => Ok(Schedule::Single),
            (Frequency::Single, Some(_)) => Err(ValidationError::EndDateNotAllowed("single")),
            (Frequency::Monthly, end_date) => Ok(Schedule::Monthly { end_date }),
            (Frequency::Yearly, None) => Ok(Schedule::Yearly),
            (Frequency::Yearly, Some(_)) => Err(ValidationError::EndDateNotAllowed("yearly")),
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Schedule::Single => Frequency::Single,
            Schedule::Monthly { .. } => Frequency::Monthly,
            Schedule::Yearly => Frequency::Yearly,
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Schedule::Monthly { end_date } => *end_date,
            _ => None,
        }
    }
}

/// The user-facing choice a savings goal was created with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SavingsMode {
    /// "I want X in total by date D".
    #[serde(alias = "single")]
    Target,
    /// "I can put Y aside every month until date D".
    Monthly,
}

impl SavingsMode {
    /// Maps the frequency picked on a savings form to a goal mode.
    pub fn from_frequency(frequency: Frequency) -> Result<Self, ValidationError> {
        match frequency {
            Frequency::Single => Ok(SavingsMode::Target),
            Frequency::Monthly => Ok(SavingsMode::Monthly),
            Frequency::Yearly => Err(ValidationError::UnsupportedSavingsFrequency("yearly")),
        }
    }

    /// Frequency label written to interchange files.
    pub fn interchange_label(&self) -> &'static str {
        match self {
            SavingsMode::Target => "single",
            SavingsMode::Monthly => "monthly",
        }
    }
}

impl FromStr for SavingsMode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "target" => Ok(SavingsMode::Target),
            other => SavingsMode::from_frequency(other.parse()?),
        }
    }
}

/// One stored financial entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredEntry", into = "StoredEntry")]
pub struct Entry {
    pub id: EntryId,
    pub category: String,
    pub description: String,
    /// Per-occurrence amount for recurring entries.
    pub amount: f64,
    /// Anchor date: the first occurrence.
    pub date: NaiveDate,
    pub schedule: Schedule,
    /// Goal total, only present on savings goals.
    pub total_amount: Option<f64>,
    pub original_frequency: Option<SavingsMode>,
}

impl Entry {
    pub fn frequency(&self) -> Frequency {
        self.schedule.frequency()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.schedule.end_date()
    }

    /// Bounded monthly entries are the only ones with a finite total.
    pub fn is_bounded(&self) -> bool {
        self.end_date().is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if let Some(end) = self.end_date() {
            if end < self.date {
                return Err(ValidationError::EndBeforeStart {
                    start: self.date,
                    end,
                });
            }
        }
        if self.total_amount.is_some() && !self.is_bounded() {
            return Err(ValidationError::TotalWithoutGoal);
        }
        Ok(())
    }
}

/// Raw input for a new entry, as collected from a form or an import row.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: String,
    pub frequency: Frequency,
    pub end_date: Option<String>,
}

impl EntryDraft {
    pub fn new(category: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: String::new(),
            amount,
            date: date.into(),
            frequency: Frequency::Single,
            end_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    pub fn parsed_date(&self) -> Result<NaiveDate, ValidationError> {
        parse_iso_date(&self.date).ok_or_else(|| ValidationError::InvalidDate(self.date.clone()))
    }

    /// Blank end dates count as absent.
    pub fn parsed_end_date(&self) -> Result<Option<NaiveDate>, ValidationError> {
        match self.end_date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_iso_date(raw)
                .map(Some)
                .ok_or_else(|| ValidationError::InvalidDate(raw.to_string())),
        }
    }

    /// Builds a validated income/expense entry with a fresh id.
    pub fn into_entry(self) -> Result<Entry, ValidationError> {
        let date = self.parsed_date()?;
        let schedule = Schedule::from_parts(self.frequency, self.parsed_end_date()?)?;
        let entry = Entry {
            id: Uuid::new_v4(),
            category: self.category.trim().to_string(),
            description: self.description,
            amount: self.amount,
            date,
            schedule,
            total_amount: None,
            original_frequency: None,
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// Partial edit applied by the store's update operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub schedule: Option<Schedule>,
    pub total_amount: Option<f64>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }

    pub fn touches_dates(&self) -> bool {
        self.date.is_some() || self.schedule.is_some()
    }

    /// Merges the patch into a copy of `entry`; the original is untouched.
    pub fn apply_to(&self, entry: &Entry) -> Entry {
        let mut candidate = entry.clone();
        if let Some(category) = &self.category {
            candidate.category = category.trim().to_string();
        }
        if let Some(description) = &self.description {
            candidate.description = description.clone();
        }
        if let Some(amount) = self.amount {
            candidate.amount = amount;
        }
        if let Some(date) = self.date {
            candidate.date = date;
        }
        if let Some(schedule) = self.schedule {
            candidate.schedule = schedule;
        }
        if let Some(total) = self.total_amount {
            candidate.total_amount = Some(total);
        }
        candidate
    }
}

/// An entry projected onto one concrete date. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence<'a> {
    pub entry: &'a Entry,
    pub date: NaiveDate,
}

impl<'a> Occurrence<'a> {
    pub fn amount(&self) -> f64 {
        self.entry.amount
    }

    pub fn category(&self) -> &'a str {
        &self.entry.category
    }

    pub fn id(&self) -> EntryId {
        self.entry.id
    }
}

/// Wire shape of an entry inside the persisted `budgetData` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: Uuid,
    category: String,
    #[serde(default)]
    description: String,
    amount: f64,
    date: NaiveDate,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_frequency: Option<SavingsMode>,
}

impl TryFrom<StoredEntry> for Entry {
    type Error = ValidationError;

    fn try_from(stored: StoredEntry) -> Result<Self, Self::Error> {
        let end_date = match stored.frequency {
            Frequency::Monthly => stored.end_date,
            _ => {
                if stored.end_date.is_some() {
                    tracing::warn!(
                        "entry {} is {} but carries an end date; ignoring it",
                        stored.id,
                        stored.frequency
                    );
                }
                None
            }
        };
        let entry = Entry {
            id: stored.id,
            category: stored.category,
            description: stored.description,
            amount: stored.amount,
            date: stored.date,
            schedule: Schedule::from_parts(stored.frequency, end_date)?,
            total_amount: stored.total_amount,
            original_frequency: stored.original_frequency,
        };
        entry.validate()?;
        Ok(entry)
    }
}

impl From<Entry> for StoredEntry {
    fn from(entry: Entry) -> Self {
        StoredEntry {
            id: entry.id,
            frequency: entry.schedule.frequency(),
            end_date: entry.schedule.end_date(),
            category: entry.category,
            description: entry.description,
            amount: entry.amount,
            date: entry.date,
            total_amount: entry.total_amount,
            original_frequency: entry.original_frequency,
        }
    }
}
