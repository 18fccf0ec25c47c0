//! Command-line argument definitions. Command behaviour lives in the parent module.

use std::{convert::Infallible, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::budget::{
    entry::{EntryType, Frequency},
    period::PeriodType,
};

/// Recurring-transaction projections for a personal budget
#[derive(Debug, Parser)]
#[command(name = "budget_tracker_cli")]
#[command(about = "Project recurring incomes, expenses and savings goals", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add an income, expense or savings goal
    Add(AddArgs),

    /// List entries of one type in a period
    List {
        kind: EntryType,
        /// day, month, year or all
        #[arg(short, long, default_value = "all", value_parser = parse_period)]
        period: PeriodType,
        /// Reference date of the period (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// One row per occurrence instead of one per entry
        #[arg(long)]
        expanded: bool,
    },

    /// Delete an entry by id
    Delete { id: Uuid },

    /// Projected balance over the coming months
    Balance {
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Bucketed balance timeline from today
    Timeline {
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Period balance and category shares
    Report {
        #[arg(short, long, default_value = "month", value_parser = parse_period)]
        period: PeriodType,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Simple and compound interest growth
    Forecast {
        principal: f64,
        /// Yearly rate in percent
        #[arg(allow_negative_numbers = true)]
        rate: f64,
        years: u32,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoryAction>,
    },

    /// Write categories and entries to a CSV file
    Export { file: PathBuf },

    /// Replace all data with the contents of a CSV file
    Import { file: PathBuf },

    /// Show build information
    Version,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// income, expense or saving
    pub kind: EntryType,
    /// Category id or name
    pub category: String,
    /// Amount per occurrence; the goal total for target savings goals
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,
    /// First occurrence, or the target date of a savings goal
    pub date: NaiveDate,
    /// single, monthly or yearly
    #[arg(short, long, default_value = "single")]
    pub frequency: Frequency,
    /// Last occurrence of a monthly entry
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories, optionally of one type
    List { kind: Option<EntryType> },

    /// Add a category
    Add {
        kind: EntryType,
        name: String,
        #[arg(long, default_value = "fa-tag")]
        icon: String,
    },

    /// Remove a category; entries keep their reference
    Remove { kind: EntryType, id: u64 },
}

/// Unknown labels mean "no filter".
fn parse_period(raw: &str) -> Result<PeriodType, Infallible> {
    Ok(PeriodType::parse_lenient(raw))
}
