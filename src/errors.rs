use chrono::NaiveDate;
use thiserror::Error;

/// Reasons an entry (or an edit to one) is rejected before it reaches the store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(f64),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("savings target {target} must be after {today}")]
    TargetNotInFuture { target: NaiveDate, today: NaiveDate },
    #[error("{0} entries cannot carry an end date")]
    EndDateNotAllowed(&'static str),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("unknown entry type `{0}`")]
    UnknownEntryType(String),
    #[error("savings goals cannot recur {0}")]
    UnsupportedSavingsFrequency(&'static str),
    #[error("total amount only applies to savings goals")]
    TotalWithoutGoal,
    #[error("scan window end {end} is before start {start}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

/// Failures raised by key-value storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Umbrella error for operations that cross several subsystems (import, export, CLI).
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Usage(#[from] clap::Error),
}
