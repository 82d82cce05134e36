//! Bulk import across tables
//!
//! Each table is read, converted and sent as one create request. Tables are
//! independent: a failure is recorded and the next table still runs. Nothing
//! already written is rolled back.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use routebill_domain::repository::Store;
use routebill_infra::import::{read_rows, records, ImportTable, Row};
use routebill_types::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Success { count: usize },
    Failure { message: String },
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportOutcome::Success { count } => write!(f, "imported {} rows", count),
            ImportOutcome::Failure { message } => write!(f, "failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub table: ImportTable,
    pub outcome: ImportOutcome,
}

/// Files chosen for import, at most one per table
#[derive(Debug, Clone, Default)]
pub struct ImportSelection {
    files: Vec<(ImportTable, PathBuf)>,
}

impl ImportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose (or replace) the file for `table`
    pub fn set(&mut self, table: ImportTable, path: PathBuf) {
        self.files.retain(|(t, _)| *t != table);
        self.files.push((table, path));
    }

    pub fn clear(&mut self, table: ImportTable) {
        self.files.retain(|(t, _)| *t != table);
    }

    pub fn get(&self, table: ImportTable) -> Option<&Path> {
        self.files
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, p)| p.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Import every selected file in table order and report each table
pub fn run_import(store: &dyn Store, selection: &ImportSelection) -> Vec<TableReport> {
    ImportTable::ALL
        .into_iter()
        .filter_map(|table| selection.get(table).map(|path| (table, path)))
        .map(|(table, path)| {
            let outcome = match read_rows(path).and_then(|rows| import_rows(store, table, &rows)) {
                Ok(count) => {
                    info!(table = table.table_name(), count, path = %path.display(), "Import succeeded");
                    ImportOutcome::Success { count }
                }
                Err(e) => {
                    warn!(table = table.table_name(), error = %e, path = %path.display(), "Import failed");
                    ImportOutcome::Failure {
                        message: e.user_message(),
                    }
                }
            };
            TableReport { table, outcome }
        })
        .collect()
}

/// Convert rows for one table and send them as a single create request
///
/// Reference data (routes, vendors, items) is fetched fresh so that names
/// created by an earlier table in the same run resolve.
pub fn import_rows(store: &dyn Store, table: ImportTable, rows: &[Row]) -> Result<usize> {
    match table {
        ImportTable::Routes => {
            let routes = records::to_routes(rows)?;
            Ok(store.create_routes(&routes)?.len())
        }
        ImportTable::Vendors => {
            let vendors = records::to_vendors(rows, &store.list_routes()?)?;
            Ok(store.create_vendors(&vendors)?.len())
        }
        ImportTable::Items => {
            let items = records::to_items(rows)?;
            Ok(store.create_items(&items)?.len())
        }
        ImportTable::Bills => {
            let bills = records::to_bills(rows, &store.list_vendors()?)?;
            Ok(store.create_bills(&bills)?.len())
        }
        ImportTable::BillItems => {
            let lines = records::to_bill_items(rows, &store.list_items()?)?;
            store.create_bill_items(&lines)
        }
    }
}

/// Write every table's template into `dir`
pub fn write_templates(dir: &Path) -> Result<Vec<PathBuf>> {
    ImportTable::ALL
        .iter()
        .map(|table| table.write_template(dir))
        .collect()
}
