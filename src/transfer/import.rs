// CSV import with per-row error isolation.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::content::{ItemDraft, ItemError, ItemService};
use crate::model::Field;

/// What to do with a row whose `_id` names an existing item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    #[default]
    CreateOnly,
    Upsert,
}

impl std::str::FromStr for ImportMode {
    type Err = ImportError;

    /// An absent mode form value means create-only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "create_only" => Ok(ImportMode::CreateOnly),
            "upsert" => Ok(ImportMode::Upsert),
            other => Err(ImportError::InvalidMode(other.to_string())),
        }
    }
}

/// Request-level import failure. Row-level problems never surface
/// here; they land in the report's error counter instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid import mode '{0}'")]
    InvalidMode(String),
    #[error("CSV file is empty")]
    Empty,
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome counters for one import run. Every data row lands in
/// exactly one of success, errors or skipped.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: u32,
    pub errors: u32,
    pub skipped: u32,
    pub total_rows: u32,
    pub error_messages: Vec<String>,
}

/// What one CSV column feeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Id,
    Slug,
    Status,
    Field(String),
    Skip,
}

enum RowOutcome {
    Written,
    Skipped,
}

/// Sequential, row-isolated CSV import. One bad row increments the
/// error counter and processing moves on; nothing is rolled back.
#[derive(Clone)]
pub struct CsvImporter {
    items: ItemService,
}

impl CsvImporter {
    pub fn new(items: ItemService) -> Self {
        Self { items }
    }

    pub async fn import(
        &self,
        collection_id: i64,
        fields: &[Field],
        mode: ImportMode,
        data: &[u8],
        created_by: Option<i64>,
    ) -> Result<ImportReport, ImportError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ImportError::Empty);
        }
        let columns = map_columns(&headers, fields);

        let mut report = ImportReport::default();
        // The header is row 1; data rows are numbered from 2.
        let mut row_number = 1;
        for record in reader.records() {
            row_number += 1;
            report.total_rows += 1;
            match record {
                Ok(record) => {
                    match self
                        .apply_row(collection_id, &columns, &record, mode, created_by)
                        .await
                    {
                        Ok(RowOutcome::Written) => report.success += 1,
                        Ok(RowOutcome::Skipped) => report.skipped += 1,
                        Err(message) => {
                            report.errors += 1;
                            report
                                .error_messages
                                .push(format!("Row {}: {}", row_number, message));
                        }
                    }
                }
                Err(err) => {
                    report.errors += 1;
                    report
                        .error_messages
                        .push(format!("Row {}: unreadable row ({})", row_number, err));
                }
            }
        }
        Ok(report)
    }

    async fn apply_row(
        &self,
        collection_id: i64,
        columns: &[Column],
        record: &csv::StringRecord,
        mode: ImportMode,
        created_by: Option<i64>,
    ) -> Result<RowOutcome, String> {
        let mut draft = ItemDraft::default();
        let mut id: Option<i64> = None;

        // A short record leaves its trailing columns absent.
        for (column, cell) in columns.iter().zip(record.iter()) {
            match column {
                Column::Id => {
                    if !cell.is_empty() {
                        id = cell.parse::<i64>().ok().filter(|parsed| *parsed > 0);
                    }
                }
                Column::Slug => draft.slug = Some(cell.to_string()),
                Column::Status => draft.status = Some(cell.to_string()),
                Column::Field(name) => {
                    draft
                        .data
                        .insert(name.clone(), Value::String(cell.to_string()));
                }
                Column::Skip => {}
            }
        }

        // An id only resolves inside the target collection; a stray id
        // from another collection's export falls through to create.
        let existing = match id {
            Some(id) => self
                .items
                .find(id)
                .await
                .map_err(|err| {
                    warn!("CSV import lookup for item {} failed: {}", id, err);
                    "failed to write item".to_string()
                })?
                .filter(|item| item.collection_id == collection_id),
            None => None,
        };

        match (mode, existing) {
            (ImportMode::CreateOnly, Some(_)) => Ok(RowOutcome::Skipped),
            (ImportMode::Upsert, Some(item)) => self
                .items
                .update(item.id, draft)
                .await
                .map(|_| RowOutcome::Written)
                .map_err(row_message),
            _ => self
                .items
                .create(collection_id, draft, created_by)
                .await
                .map(|_| RowOutcome::Written)
                .map_err(row_message),
        }
    }
}

fn row_message(err: ItemError) -> String {
    match err {
        ItemError::Store(err) => {
            warn!("CSV import row write failed: {}", err);
            "failed to write item".to_string()
        }
        other => other.to_string(),
    }
}

fn map_columns(headers: &csv::StringRecord, fields: &[Field]) -> Vec<Column> {
    headers
        .iter()
        .map(|header| match header {
            "_id" => Column::Id,
            "_slug" => Column::Slug,
            "_status" => Column::Status,
            _ if header.starts_with('_') => Column::Skip,
            _ => fields
                .iter()
                .find(|field| field.name == header)
                .map(|field| Column::Field(field.name.clone()))
                .unwrap_or(Column::Skip),
        })
        .collect()
}
