//! Incremental JSON document writer.
//!
//! The output document is a single JSON object whose values are large
//! arrays (`nodes`, `rels`). Serializing the whole document at once would
//! hold gigabytes of text in memory, so [`JsonDocWriter`] streams instead:
//! the destination is opened once, each [`JsonDocWriter::write_array`] call
//! appends one `"key": [...]` member with its items serialized one at a
//! time, and [`JsonDocWriter::finish`] closes the object.
//!
//! Two item formats:
//!
//! - **pretty** — multi-line items with a configurable indent width, for
//!   legibility;
//! - **compact** — minimal separators, one line per item.
//!
//! The difference in file size for large element counts is significant.
//! Items may come from a lazy iterator; the writer never holds more than
//! one serialized item.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonOutError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize item for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Output format for array items.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat {
    pub pretty: bool,
    /// Indent width; pretty items nest by it, compact items are prefixed
    /// by it once.
    pub indent: usize,
}

/// Streaming writer for one JSON object of array-valued keys.
///
/// Keys appear in call order. Dropping the writer without `finish` leaves
/// a syntactically invalid document, which is intended: a run that aborts
/// mid-write must not look complete.
pub struct JsonDocWriter {
    out: BufWriter<File>,
    format: JsonFormat,
    keys_written: usize,
}

impl JsonDocWriter {
    /// Open (truncate) the destination and start the document.
    pub fn create(path: &Path, format: JsonFormat) -> Result<Self, JsonOutError> {
        let out = BufWriter::new(File::create(path)?);
        Ok(Self {
            out,
            format,
            keys_written: 0,
        })
    }

    /// Append `"key": [items...]` to the document.
    ///
    /// Returns the number of items written.
    pub fn write_array<T, I>(&mut self, key: &str, items: I) -> Result<usize, JsonOutError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let top = " ".repeat(self.format.indent / 2);
        if self.keys_written == 0 {
            write!(self.out, "{{\n{top}\"{key}\":{top}[\n")?;
        } else {
            write!(self.out, ",\n{top}\"{key}\":{top}[\n")?;
        }
        self.keys_written += 1;

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}: {pos} items")
                .expect("spinner template"),
        );
        bar.set_message(format!("Writing {key} array"));

        let mut count = 0usize;
        for item in items {
            if count > 0 {
                self.out.write_all(b",\n")?;
            }
            let rendered = self.render_item(&item).map_err(|source| {
                JsonOutError::Serialize {
                    key: key.to_string(),
                    source,
                }
            })?;
            self.out.write_all(rendered.as_bytes())?;
            count += 1;
            bar.inc(1);
        }
        bar.finish_and_clear();

        write!(self.out, "\n{top}]")?;
        Ok(count)
    }

    /// Close the object and flush the file.
    pub fn finish(mut self) -> Result<(), JsonOutError> {
        self.out.write_all(b"\n}\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn render_item<T: Serialize>(&self, item: &T) -> Result<String, serde_json::Error> {
        let item_indent = " ".repeat(self.format.indent);
        if self.format.pretty {
            let step = vec![b' '; self.format.indent];
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(&step);
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            item.serialize(&mut ser)?;
            let text = String::from_utf8(buf).expect("serde_json emits UTF-8");
            Ok(text
                .lines()
                .map(|line| format!("{item_indent}{line}"))
                .collect::<Vec<_>>()
                .join("\n"))
        } else {
            Ok(format!("{item_indent}{}", serde_json::to_string(item)?))
        }
    }
}
