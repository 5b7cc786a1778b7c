//! Lazy table scans.
//!
//! A [`TableScan`] records the stages of one table read — row filters,
//! deduplication, projection, row cap — and applies them in a single
//! streaming pass when [`TableScan::collect`] is called. Rows are filtered
//! and deduplicated as they come off the reader, so only the surviving rows
//! are ever held in memory.
//!
//! Stage order is fixed: row cap (on rows read) → filter → deduplicate →
//! project. Deduplication sees the full-width row (all declared columns);
//! projection narrows afterwards.

use crate::timer::ScanTimer;
use crate::{source_path, Table, TableError};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use umls2jkg_config::UmlsConfig;

/// Table-level row filters. Each filter is a no-op when the named column is
/// absent from the declared schema — absence is never an error.
#[derive(Debug, Clone, Copy)]
pub struct RowFilters {
    /// Drop rows flagged suppressed (`SUPPRESS == "O"`).
    pub suppress_excluded: bool,
    /// Keep only English-language rows (`LAT == "ENG"`).
    pub english_only: bool,
    /// Keep only rows flagged current (`CURVER == "Y"`).
    pub current_version_only: bool,
}

impl Default for RowFilters {
    fn default() -> Self {
        Self {
            suppress_excluded: true,
            english_only: true,
            current_version_only: true,
        }
    }
}

impl RowFilters {
    pub fn none() -> Self {
        Self {
            suppress_excluded: false,
            english_only: false,
            current_version_only: false,
        }
    }
}

/// A deferred scan of one source file. Nothing is read until `collect`.
pub struct TableScan<'a> {
    cfg: &'a UmlsConfig,
    file_id: String,
    filters: RowFilters,
    projection: Option<Vec<String>>,
    limit: Option<usize>,
    clean_file: bool,
}

impl<'a> TableScan<'a> {
    pub fn new(cfg: &'a UmlsConfig, file_id: &str) -> Self {
        Self {
            cfg,
            file_id: file_id.to_string(),
            filters: RowFilters::default(),
            projection: None,
            limit: None,
            clean_file: false,
        }
    }

    pub fn filters(mut self, filters: RowFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Project to a subset of columns after filtering and deduplication.
    pub fn select<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.projection = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Cap the number of rows read off the file.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Route the read through the quote-stripping preprocessing cache.
    pub fn clean_file(mut self, clean: bool) -> Self {
        self.clean_file = clean;
        self
    }

    /// Run the scan and materialize the filtered, deduplicated table.
    pub fn collect(self) -> Result<Table, TableError> {
        let columns = self
            .cfg
            .columns_for(&self.file_id)
            .map_err(|_| TableError::MissingColumnSchema {
                file_id: self.file_id.clone(),
            })?;

        let path: PathBuf = if self.clean_file {
            crate::clean::ensure_clean_file(self.cfg, &self.file_id)?
        } else {
            source_path(self.cfg, &self.file_id)
        };
        if !path.exists() {
            return Err(TableError::InputFileNotFound { path });
        }

        // Estimate the row total for the display. An explicit cap wins;
        // otherwise file size over the configured average row size.
        let est_total = match self.limit {
            Some(n) => n as u64,
            None => {
                let file_size = fs::metadata(&path)?.len();
                let avg = self.cfg.row_size(&self.file_id)?.max(1);
                file_size / avg
            }
        };

        let suppress_idx = self
            .filters
            .suppress_excluded
            .then(|| columns.iter().position(|c| c == "SUPPRESS"))
            .flatten();
        let english_idx = self
            .filters
            .english_only
            .then(|| columns.iter().position(|c| c == "LAT"))
            .flatten();
        let curver_idx = self
            .filters
            .current_version_only
            .then(|| columns.iter().position(|c| c == "CURVER"))
            .flatten();

        let timer = ScanTimer::start(format!("Scanning {} (~{} rows)", self.file_id, est_total));
        let started = Instant::now();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|source| TableError::Parse {
                file_id: self.file_id.clone(),
                source,
            })?;

        let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut scanned: u64 = 0;

        for record in reader.records() {
            if let Some(cap) = self.limit {
                if scanned as usize >= cap {
                    break;
                }
            }
            let record = record.map_err(|source| TableError::Parse {
                file_id: self.file_id.clone(),
                source,
            })?;
            scanned += 1;

            // Rows end with a terminal `|`, so the reader sees one trailing
            // empty field beyond the declared schema; short rows pad with
            // nulls.
            let cells: Vec<Option<String>> = (0..columns.len())
                .map(|i| {
                    record
                        .get(i)
                        .filter(|v| !v.is_empty())
                        .map(|v| v.to_string())
                })
                .collect();

            if let Some(i) = suppress_idx {
                if cells[i].as_deref() == Some("O") {
                    continue;
                }
            }
            if let Some(i) = english_idx {
                if cells[i].as_deref() != Some("ENG") {
                    continue;
                }
            }
            if let Some(i) = curver_idx {
                if cells[i].as_deref() != Some("Y") {
                    continue;
                }
            }

            if seen.insert(cells.clone()) {
                rows.push(cells);
            }
        }
        drop(seen);
        timer.stop();

        info!(
            file = %self.file_id,
            scanned,
            kept = rows.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "table scan complete"
        );

        let table = Table::new(columns, rows);
        match self.projection {
            Some(selection) => Ok(project(&table, &selection)),
            None => Ok(table),
        }
    }
}

/// Narrow a table to the named columns, in the order given. Unknown names
/// yield all-null columns rather than an error, mirroring the permissive
/// filter behavior.
fn project(table: &Table, selection: &[String]) -> Table {
    let indices: Vec<Option<usize>> = selection.iter().map(|c| table.column_index(c)).collect();
    let rows = table
        .rows()
        .map(|row| {
            indices
                .iter()
                .map(|idx| idx.and_then(|i| row.cells()[i].clone()))
                .collect()
        })
        .collect();
    Table::new(selection.to_vec(), rows)
}
