//! CSV interchange: one file carrying the category book followed by every
//! stored entry.
//!
//! Savings rows are written in the shape a user entered them (goal total or
//! monthly amount, target date) and normalised again on import.

use std::io::{Read, Write};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    budget::{
        category::{Category, CategoryBook},
        entry::{Entry, EntryDraft, EntryType, Frequency, SavingsMode},
    },
    errors::TrackerError,
    store::{BudgetDocument, CategoryRegistry, EntryStore},
};

pub const HEADER: [&str; 9] = [
    "DataType",
    "Type",
    "Name",
    "Icon",
    "Description",
    "Amount",
    "Date",
    "Frequency",
    "EndDate",
];

const CATEGORY_ROW: &str = "category";
const TRANSACTION_ROW: &str = "transaction";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
struct CsvRow {
    data_type: String,
    #[serde(rename = "Type")]
    kind: String,
    name: String,
    icon: String,
    description: String,
    amount: String,
    date: String,
    frequency: String,
    end_date: String,
}

impl CsvRow {
    fn category(kind: EntryType, category: &Category) -> Self {
        Self {
            data_type: CATEGORY_ROW.into(),
            kind: kind.as_str().into(),
            name: category.name.clone(),
            icon: category.icon.clone(),
            ..Self::default()
        }
    }

    fn transaction(kind: EntryType, entry: &Entry, categories: &CategoryBook) -> Self {
        let name = categories
            .details(kind, &entry.category)
            .map(|category| category.name.clone())
            .unwrap_or_default();
        let mut row = Self {
            data_type: TRANSACTION_ROW.into(),
            kind: kind.as_str().into(),
            name,
            description: entry.description.clone(),
            ..Self::default()
        };
        let end_date = entry.end_date().map(|date| date.to_string()).unwrap_or_default();
        match (kind, entry.original_frequency) {
            (EntryType::Saving, Some(SavingsMode::Target)) => {
                row.amount = entry.total_amount.unwrap_or(entry.amount).to_string();
                row.date = end_date.clone();
                row.frequency = SavingsMode::Target.interchange_label().into();
            }
            (EntryType::Saving, _) => {
                row.amount = entry.amount.to_string();
                row.date = end_date.clone();
                row.frequency = SavingsMode::Monthly.interchange_label().into();
            }
            _ => {
                row.amount = entry.amount.to_string();
                row.date = entry.date.to_string();
                row.frequency = entry.frequency().as_str().into();
            }
        }
        row.end_date = end_date;
        row
    }
}

/// Outcome of [`import_csv`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub categories: usize,
    pub imported: usize,
    /// Rows that were malformed, referenced an unknown category, or failed validation.
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Writes the category book and every entry of `store` to `writer`.
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(
    writer: W,
    store: &EntryStore,
    categories: &CategoryBook,
) -> Result<usize, TrackerError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    let mut rows = 0;
    for kind in EntryType::ALL {
        for category in categories.of(kind) {
            wtr.serialize(CsvRow::category(kind, category))?;
            rows += 1;
        }
    }
    for kind in EntryType::ALL {
        for entry in store.all(kind) {
            wtr.serialize(CsvRow::transaction(kind, entry, categories))?;
            rows += 1;
        }
    }
    wtr.flush()?;
    tracing::info!("exported {} rows", rows);
    Ok(rows)
}

/// Replaces all categories and entries with the contents of `reader`.
///
/// The whole file is parsed before anything is cleared, so an unreadable
/// file leaves the current data in place. Category ids are renumbered from 1
/// and transactions are re-linked by category name within their type.
pub fn import_csv<R: Read>(
    reader: R,
    store: &mut EntryStore,
    categories: &mut CategoryRegistry,
) -> Result<ImportReport, TrackerError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut report = ImportReport::default();
    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                tracing::warn!("skipping malformed row {}: {}", index + 2, err);
                report.skipped += 1;
            }
        }
    }

    let mut book = CategoryBook::empty();
    for row in rows.iter().filter(|row| row.data_type == CATEGORY_ROW) {
        match row.kind.parse::<EntryType>() {
            Ok(kind) => {
                book.add(kind, row.name.clone(), row.icon.clone());
                report.categories += 1;
            }
            Err(err) => {
                tracing::warn!("skipping category `{}`: {}", row.name, err);
                report.skipped += 1;
            }
        }
    }

    let mut document = BudgetDocument::default();
    for row in rows.iter().filter(|row| row.data_type == TRANSACTION_ROW) {
        match draft_from_row(row, &book) {
            Ok((kind, draft)) => match store.prepare(kind, draft) {
                Ok(entry) => {
                    document.push(kind, entry);
                    report.imported += 1;
                }
                Err(err) => {
                    tracing::warn!("skipping {} `{}`: {}", kind, row.description, err);
                    report.skipped += 1;
                }
            },
            Err(err) => {
                tracing::warn!("skipping transaction `{}`: {}", row.description, err);
                report.skipped += 1;
            }
        }
    }

    if let Err(err) = categories.replace(book) {
        report.warnings.push(format!("categories were not persisted: {err}"));
    }
    let change = store.replace_all(document);
    if let Some(warning) = change.persistence_warning {
        report.warnings.push(warning);
    }
    tracing::info!(
        "imported {} categories and {} entries ({} rows skipped)",
        report.categories,
        report.imported,
        report.skipped
    );
    Ok(report)
}

fn draft_from_row(
    row: &CsvRow,
    book: &CategoryBook,
) -> Result<(EntryType, EntryDraft), TrackerError> {
    let kind: EntryType = row.kind.parse()?;
    let category = book.find_by_name(kind, &row.name).ok_or_else(|| {
        TrackerError::InvalidInput(format!("unknown {} category `{}`", kind, row.name))
    })?;
    let amount: f64 = row
        .amount
        .parse()
        .map_err(|_| TrackerError::InvalidInput(format!("invalid amount `{}`", row.amount)))?;
    let frequency: Frequency = row.frequency.parse()?;
    let mut draft = EntryDraft::new(category.id.to_string(), amount, row.date.clone())
        .with_description(row.description.clone())
        .with_frequency(frequency);
    // Savings carry the target date in both columns; the draft date is the target.
    if kind != EntryType::Saving && !row.end_date.is_empty() {
        draft = draft.with_end_date(row.end_date.clone());
    }
    Ok((kind, draft))
}
