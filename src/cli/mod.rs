//! Non-interactive command-line front end over the entry store and projections.

pub mod args;
pub mod output;

use std::{
    env,
    ffi::OsString,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    sync::Arc,
};

use chrono::NaiveDate;
use clap::Parser;
use uuid::Uuid;

use crate::{
    budget::{
        entry::{EntryDraft, EntryType, Occurrence},
        period::{parse_iso_date, PeriodType},
        recurring::ExpansionMode,
    },
    clock::{Clock, FixedClock, SystemClock},
    config::{ConfigManager, TrackerConfig},
    errors::TrackerError,
    forecast::interest_projection,
    interchange::{export_csv, import_csv},
    services::{ProjectionService, TimelineService},
    storage::{JsonFileStore, KeyValueStore},
    store::{CategoryRegistry, EntryStore, StoreChange},
    utils::build_info,
};

use args::{AddArgs, CategoryAction, Cli, Command};
use output::{format_amount, signed_amount};

/// Pins "today" for every command; useful for scripted runs.
pub const TODAY_ENV: &str = "BUDGET_TRACKER_TODAY";

/// Parses the process arguments and runs the command. Usage errors exit
/// through clap.
pub fn run_cli() -> Result<(), TrackerError> {
    execute(Cli::parse())
}

/// Runs one command line; `args` includes the binary name.
pub fn run<I, T>(args: I) -> Result<(), TrackerError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    execute(Cli::try_parse_from(args)?)
}

fn execute(cli: Cli) -> Result<(), TrackerError> {
    match cli.command {
        Command::Version => {
            output::info(build_info::current().summary());
            Ok(())
        }
        Command::Forecast {
            principal,
            rate,
            years,
        } => {
            forecast(principal, rate, years);
            Ok(())
        }
        command => Session::open()?.dispatch(command),
    }
}

fn forecast(principal: f64, rate: f64, years: u32) {
    output::section(format!("Growth of {} at {rate}%", format_amount(principal)));
    for point in interest_projection(principal, rate, years) {
        output::info(format!(
            "year {:>3}  simple {:>14}  compound {:>14}",
            point.year,
            format_amount(point.simple),
            format_amount(point.compound)
        ));
    }
}

fn resolve_clock() -> Result<Arc<dyn Clock>, TrackerError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => parse_iso_date(&raw)
            .map(|date| Arc::new(FixedClock(date)) as Arc<dyn Clock>)
            .ok_or_else(|| TrackerError::InvalidInput(format!("invalid {TODAY_ENV} `{raw}`"))),
        _ => Ok(Arc::new(SystemClock)),
    }
}

struct Session {
    config: TrackerConfig,
    store: EntryStore,
    categories: CategoryRegistry,
}

impl Session {
    fn open() -> Result<Self, TrackerError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        let backend: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(manager.data_dir())?);
        let store = EntryStore::load(backend.clone(), resolve_clock()?)?;
        let categories = CategoryRegistry::load(backend)?;
        Ok(Self {
            config,
            store,
            categories,
        })
    }

    fn today(&self) -> NaiveDate {
        self.store.clock().today()
    }

    fn category_name(&self, kind: EntryType, reference: &str) -> String {
        self.categories
            .book()
            .display_name(kind, reference, &self.config.uncategorized_label)
            .to_string()
    }

    fn report_change(change: &StoreChange) {
        if !change.persisted() {
            output::warning(format!(
                "change kept for this session only: {}",
                change.persistence_warning.as_deref().unwrap_or("write failed")
            ));
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), TrackerError> {
        match command {
            Command::Add(add) => self.add(add),
            Command::List {
                kind,
                period,
                date,
                expanded,
            } => {
                self.list(kind, period, date, expanded);
                Ok(())
            }
            Command::Delete { id } => {
                self.delete(id);
                Ok(())
            }
            Command::Balance { months } => {
                self.balance(months);
                Ok(())
            }
            Command::Timeline { months } => {
                self.timeline(months);
                Ok(())
            }
            Command::Report { period, date } => {
                self.report(period, date);
                Ok(())
            }
            Command::Categories { action } => self.categories(action),
            Command::Export { file } => self.export(&file),
            Command::Import { file } => self.import(&file),
            Command::Version | Command::Forecast { .. } => Ok(()),
        }
    }

    fn add(&mut self, add: AddArgs) -> Result<(), TrackerError> {
        let kind = add.kind;
        // Accept either a category id or its name.
        let category = self
            .categories
            .book()
            .find_by_name(kind, &add.category)
            .map(|found| found.id.to_string())
            .unwrap_or(add.category);
        let mut draft = EntryDraft::new(category, add.amount, add.date.to_string())
            .with_description(add.description)
            .with_frequency(add.frequency);
        if let Some(end_date) = add.end_date {
            draft = draft.with_end_date(end_date.to_string());
        }

        let change = self.store.add(kind, draft)?;
        Self::report_change(&change);
        if let Some(id) = change.id {
            output::success(format!("Added {kind} entry {id}"));
        }
        Ok(())
    }

    fn list(&self, kind: EntryType, period: PeriodType, date: Option<NaiveDate>, expanded: bool) {
        let reference = date.unwrap_or_else(|| self.today());
        let mode = ExpansionMode::for_balance(expanded);

        let mut rows: Vec<Occurrence<'_>> =
            ProjectionService::entries_for_period(&self.store, kind, period, reference, mode);
        rows.sort_by(|a, b| b.date.cmp(&a.date));

        output::section(format!("{kind} ({period} of {reference})"));
        let mut total = 0.0;
        for row in &rows {
            total += row.amount();
            let schedule = match row.entry.end_date() {
                Some(end) => format!("{} until {end}", row.entry.frequency()),
                None => row.entry.frequency().to_string(),
            };
            output::info(format!(
                "{}  {:<16} {:>12}  {:<24} {:<20} {}",
                row.date,
                self.category_name(kind, row.category()),
                format_amount(row.amount()),
                row.entry.description,
                schedule,
                row.id()
            ));
        }
        output::info(format!("{} rows, total {}", rows.len(), format_amount(total)));
    }

    fn delete(&mut self, id: Uuid) {
        match self.store.delete(id) {
            Some(change) => {
                Self::report_change(&change);
                output::success(format!("Deleted entry {id}"));
            }
            None => output::info(format!("No entry {id}; nothing to delete")),
        }
    }

    fn balance(&self, months: Option<u32>) {
        let (months, years) = match months {
            Some(months) => (months, f64::from(months) / 12.0),
            None => (self.config.default_balance_months, self.config.balance_years()),
        };
        let balance = ProjectionService::multi_year_balance(&self.store, years);
        output::info(format!(
            "Projected balance over {months} months: {}",
            signed_amount(balance)
        ));
    }

    fn timeline(&self, months: Option<u32>) {
        let months = months.unwrap_or(self.config.timeline_scale_months);
        let timeline = TimelineService::period_buckets(&self.store, months);
        output::section(format!("Timeline, {months} months ({:?})", timeline.granularity));
        for bucket in &timeline.buckets {
            output::info(format!(
                "{}  in {:>12}  out {:>12}  saved {:>12}  balance {}",
                bucket.start.format("%Y-%m"),
                format_amount(bucket.incomes),
                format_amount(bucket.expenses),
                format_amount(bucket.savings),
                signed_amount(bucket.balance)
            ));
        }
        output::info(format!("Total: {}", signed_amount(timeline.total_balance())));
    }

    fn report(&self, period: PeriodType, date: Option<NaiveDate>) {
        let reference = date.unwrap_or_else(|| self.today());
        output::section(format!("Report for the {period} of {reference}"));
        output::info(format!(
            "Period balance: {}",
            signed_amount(ProjectionService::period_balance(&self.store, period, reference))
        ));

        let months = self.config.share_horizon_months;
        let shares = ProjectionService::category_shares(
            &self.store,
            self.categories.book(),
            months,
            &self.config.uncategorized_label,
        );
        output::section(format!("Shares over the next {months} months"));
        for (label, values, total) in [
            ("in ", &shares.incomes, shares.total_incomes()),
            ("out", &shares.outflows, shares.total_outflows()),
        ] {
            for (name, amount) in values {
                let pct = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
                output::info(format!(
                    "{label} {name:<16} {:>12} {pct:>5.1}%",
                    format_amount(*amount)
                ));
            }
        }
    }

    fn categories(&mut self, action: Option<CategoryAction>) -> Result<(), TrackerError> {
        match action.unwrap_or(CategoryAction::List { kind: None }) {
            CategoryAction::List { kind } => {
                let kinds = match kind {
                    Some(kind) => vec![kind],
                    None => EntryType::ALL.to_vec(),
                };
                for kind in kinds {
                    output::section(kind);
                    for category in self.categories.book().of(kind) {
                        output::info(format!(
                            "{:>4}  {:<20} {}",
                            category.id, category.name, category.icon
                        ));
                    }
                }
            }
            CategoryAction::Add { kind, name, icon } => {
                let id = self.categories.add(kind, name.trim(), icon)?;
                output::success(format!("Added {kind} category {id}"));
            }
            CategoryAction::Remove { kind, id } => match self.categories.remove(kind, id)? {
                Some(removed) => {
                    output::success(format!("Removed {kind} category {}", removed.name))
                }
                None => output::info(format!("No {kind} category {id}; nothing to remove")),
            },
        }
        Ok(())
    }

    fn export(&self, path: &Path) -> Result<(), TrackerError> {
        let file = BufWriter::new(File::create(path)?);
        let rows = export_csv(file, &self.store, self.categories.book())?;
        output::success(format!("Exported {rows} rows to {}", path.display()));
        Ok(())
    }

    fn import(&mut self, path: &Path) -> Result<(), TrackerError> {
        let file = BufReader::new(File::open(path)?);
        let report = import_csv(file, &mut self.store, &mut self.categories)?;
        for warning in &report.warnings {
            output::warning(warning);
        }
        output::success(format!(
            "Imported {} categories and {} entries ({} skipped)",
            report.categories, report.imported, report.skipped
        ));
        Ok(())
    }
}
