//! Quote-stripping preprocessing for known-malformed source files.
//!
//! MRCONSO and MRDEF contain fields with unescaped `"` characters, which
//! delimited parsers treat as broken quoting. The fix is a one-time pre-pass
//! that rewrites the file with every quote character removed.
//!
//! Cleaned copies are cached under the output directory, keyed by file name
//! only — there is no content-hash invalidation, so a stale copy survives
//! until it is deleted by hand.

use crate::{source_path, TableError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use umls2jkg_config::UmlsConfig;

/// Return the path of a cleaned copy of `file_id`, producing it on first use.
pub fn ensure_clean_file(cfg: &UmlsConfig, file_id: &str) -> Result<PathBuf, TableError> {
    let dirty = source_path(cfg, file_id);
    let clean = cfg
        .directories
        .output_dir
        .join(format!("{file_id}.RRF"));

    if clean.exists() {
        warn!(
            path = %clean.display(),
            "using existing cleaned file; delete it to force pre-processing"
        );
        return Ok(clean);
    }
    if !dirty.exists() {
        return Err(TableError::InputFileNotFound { path: dirty });
    }

    info!(path = %dirty.display(), "cleaning file");
    if let Some(parent) = clean.parent() {
        fs::create_dir_all(parent)?;
    }

    let total = fs::metadata(&dirty)?.len();
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {bytes}/{total_bytes}")
            .expect("progress template"),
    );
    bar.set_message(format!("Cleaning {file_id}"));

    let reader = BufReader::new(File::open(&dirty)?);
    let mut writer = BufWriter::new(File::create(&clean)?);
    for line in reader.lines() {
        let line = line?;
        bar.inc(line.len() as u64 + 1);
        let fixed: String = line.chars().filter(|c| *c != '"').collect();
        writer.write_all(fixed.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    bar.finish_and_clear();

    Ok(clean)
}
