//! Run configuration for the UMLS-to-JKG converter.
//!
//! A conversion run is described by a single TOML file:
//!
//! - `[directories]` — location of the MetamorphoSYS subset (`umls_dir`,
//!   which contains the `META/` and `NET/` trees) and the output directory.
//! - `[json_out]` — output file name plus the pretty/compact switch and
//!   indent width for the JSON document.
//! - `[columns]` — the positional column schema for every source file, as a
//!   comma-separated list. The `.RRF` files carry no header row, so this
//!   table is authoritative.
//! - `[rowsizes]` — average serialized row size in bytes per file, used only
//!   to estimate scan totals for the progress display.
//!
//! Configuration problems are fatal: a missing file, an unparsable file, or
//! a missing section/key aborts the run before any table I/O starts.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration file: {path}")]
    MissingFile { path: PathBuf },

    #[error("error parsing configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing key [{section}] {key} in configuration")]
    MissingKey { section: &'static str, key: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Directories {
    /// Root of the MetamorphoSYS subset; `META/` and `NET/` live underneath.
    pub umls_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonOut {
    pub pretty: bool,
    pub indent: usize,
    pub output_filename: String,
}

/// The full configuration surface consumed by the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct UmlsConfig {
    pub directories: Directories,
    pub json_out: JsonOut,
    /// Positional column names per source file, comma-separated.
    pub columns: BTreeMap<String, String>,
    /// Average serialized row size in bytes per source file.
    pub rowsizes: BTreeMap<String, u64>,
}

impl UmlsConfig {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The declared column schema for a source file.
    pub fn columns_for(&self, file_id: &str) -> Result<Vec<String>, ConfigError> {
        let raw = self
            .columns
            .get(file_id)
            .ok_or_else(|| ConfigError::MissingKey {
                section: "columns",
                key: file_id.to_string(),
            })?;
        Ok(raw.split(',').map(|c| c.trim().to_string()).collect())
    }

    /// Average row size for a source file, for scan-total estimates.
    pub fn row_size(&self, file_id: &str) -> Result<u64, ConfigError> {
        self.rowsizes
            .get(file_id)
            .copied()
            .ok_or_else(|| ConfigError::MissingKey {
                section: "rowsizes",
                key: file_id.to_string(),
            })
    }

    /// Full path of the output JSON document.
    pub fn output_path(&self) -> PathBuf {
        self.directories
            .output_dir
            .join(&self.json_out.output_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[directories]
umls_dir = "/data/umls/subset"
output_dir = "/data/umls/out"

[json_out]
pretty = false
indent = 4
output_filename = "jkg.json"

[columns]
MRDOC = "DOCKEY,VALUE,TYPE,EXPL"
SRDEF = "RT,UI,STY_RL,STN_RTN,DEF,EX,UN,NH,ABR,RIN"

[rowsizes]
MRDOC = 50
SRDEF = 240
"#;

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("umls2jkg.toml");
        let mut f = fs::File::create(&path).expect("create");
        f.write_all(text.as_bytes()).expect("write");
        (dir, path)
    }

    #[test]
    fn loads_and_splits_column_schema() {
        let (_dir, path) = write_config(SAMPLE);
        let cfg = UmlsConfig::load(&path).expect("load");
        assert_eq!(
            cfg.columns_for("MRDOC").expect("columns"),
            vec!["DOCKEY", "VALUE", "TYPE", "EXPL"]
        );
        assert_eq!(cfg.row_size("SRDEF").expect("rowsize"), 240);
        assert_eq!(
            cfg.output_path(),
            PathBuf::from("/data/umls/out/jkg.json")
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = UmlsConfig::load(Path::new("/nonexistent/umls2jkg.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let (_dir, path) = write_config("[directories]\numls_dir = \"/a\"\noutput_dir = \"/b\"\n");
        let err = UmlsConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_file_id_is_a_missing_key() {
        let (_dir, path) = write_config(SAMPLE);
        let cfg = UmlsConfig::load(&path).expect("load");
        let err = cfg.columns_for("MRREL").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey {
                section: "columns",
                ..
            }
        ));
    }
}
