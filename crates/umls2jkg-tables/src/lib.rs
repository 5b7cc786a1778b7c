//! Filtered ingestion of UMLS pipe-delimited flat tables (boundary adapter).
//!
//! This crate sits at the untrusted-input boundary:
//!
//! - It reads the `.RRF` flat files of a MetamorphoSYS subset (pipe-delimited,
//!   no header row; the positional column schema comes from configuration).
//! - It applies the table-level row filters (suppression, language, current
//!   version), exact-row deduplication, and column projection.
//! - It emits plain [`Table`] values; graph semantics live downstream.
//!
//! Scans are expressed as a lazy stage pipeline ([`TableScan`]) and only the
//! filtered, deduplicated result is ever materialized, so files with tens of
//! millions of rows never sit in memory unfiltered.
//!
//! A handful of source files contain unescaped quote characters that break
//! delimited parsing; [`clean::ensure_clean_file`] rewrites those once into a
//! cache under the output directory (see the module docs for the cache
//! caveats).

pub mod clean;
pub mod scan;
pub mod timer;

pub use clean::ensure_clean_file;
pub use scan::{RowFilters, TableScan};
pub use timer::ScanTimer;

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use umls2jkg_config::{ConfigError, UmlsConfig};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("input file not found: {path}")]
    InputFileNotFound { path: PathBuf },

    #[error("no column schema configured for file {file_id}")]
    MissingColumnSchema { file_id: String },

    #[error("malformed row in {file_id}: {source}")]
    Parse {
        file_id: String,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A materialized relational table: named columns over rows of nullable
/// string cells. Empty input fields are null, matching how the flat files
/// encode absent values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    pub fn push_row(&mut self, cells: Vec<Option<String>>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }
}

/// A borrowed view of one table row with by-name cell access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Option<String>],
}

impl<'a> Row<'a> {
    /// The cell for `column`, or `None` when the cell is null or the column
    /// does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.cells.get(idx)?.as_deref()
    }

    pub fn cells(&self) -> &'a [Option<String>] {
        self.cells
    }
}

/// Resolve the on-disk location of a source file. Semantic Network files
/// (`SR*`) live under `NET/` without an extension; Metathesaurus files live
/// under `META/` with the `.RRF` extension.
pub fn source_path(cfg: &UmlsConfig, file_id: &str) -> PathBuf {
    if file_id.starts_with("SR") {
        cfg.directories.umls_dir.join("NET").join(file_id)
    } else {
        cfg.directories
            .umls_dir
            .join("META")
            .join(format!("{file_id}.RRF"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> UmlsConfig {
        let text = r#"
[directories]
umls_dir = "/umls"
output_dir = "/out"

[json_out]
pretty = false
indent = 4
output_filename = "jkg.json"

[columns]
MRDOC = "DOCKEY,VALUE,TYPE,EXPL"

[rowsizes]
MRDOC = 50
"#;
        toml::from_str(text).expect("config")
    }

    #[test]
    fn semantic_network_files_resolve_under_net() {
        let cfg = cfg();
        assert_eq!(source_path(&cfg, "SRDEF"), PathBuf::from("/umls/NET/SRDEF"));
        assert_eq!(
            source_path(&cfg, "MRREL"),
            PathBuf::from("/umls/META/MRREL.RRF")
        );
    }

    #[test]
    fn row_access_distinguishes_null_from_missing_column() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec![Some("x".into()), None]],
        );
        let row = table.rows().next().expect("row");
        assert_eq!(row.get("A"), Some("x"));
        assert_eq!(row.get("B"), None);
        assert_eq!(row.get("C"), None);
    }
}
