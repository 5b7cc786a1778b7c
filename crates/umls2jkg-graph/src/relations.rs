//! Forward/inverse relationship pair resolution.
//!
//! For every forward/inverse relationship pair, MRDOC carries two records,
//! with each relationship of the pair appearing in both the `VALUE` and
//! `EXPL` columns:
//!
//! ```text
//! DOCKEY | VALUE            | TYPE         | EXPL             |
//! RELA   | nerve_supply_of  | rela_inverse | has_nerve_supply |
//! RELA   | has_nerve_supply | rela_inverse | nerve_supply_of  |
//! ```
//!
//! Both directions collapse onto one unordered pair key, and the member
//! whose name sorts last alphabetically is selected as the **forward**
//! relationship (`nerve_supply_of` above). Edges carrying a non-forward
//! label are dropped so a symmetric relationship is never emitted twice;
//! labels with no declared inverse always pass through.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use umls2jkg_tables::Table;

const DOCKEY_RELA: &str = "RELA";
const TYPE_INVERSE: &str = "rela_inverse";

/// Per-label outcome of inverse-pair resolution.
#[derive(Debug, Clone, Default)]
pub struct ForwardRelationships {
    by_label: HashMap<String, bool>,
}

impl ForwardRelationships {
    /// Resolve the pairs declared in an MRDOC table.
    pub fn from_inverse_pairs(mrdoc: &Table) -> Self {
        // Group the declarations by unordered pair key; collect each
        // group's member names and its alphabetically greatest VALUE.
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in mrdoc.rows() {
            if row.get("DOCKEY") != Some(DOCKEY_RELA) || row.get("TYPE") != Some(TYPE_INVERSE) {
                continue;
            }
            let (value, expl) = match (row.get("VALUE"), row.get("EXPL")) {
                (Some(v), Some(e)) => (v, e),
                _ => continue,
            };
            let key = if value < expl {
                format!("{value}~{expl}")
            } else {
                format!("{expl}~{value}")
            };
            groups.entry(key).or_default().push(value.to_string());
        }

        let mut by_label = HashMap::new();
        for members in groups.into_values() {
            // Equal maxima are interchangeable; `>=` keeps the last seen.
            let mut forward = members[0].as_str();
            for member in &members {
                if member.as_str() >= forward {
                    forward = member.as_str();
                }
            }
            let forward = forward.to_string();
            for member in &members {
                by_label.insert(member.clone(), *member == forward);
            }
        }

        let resolved = Self { by_label };
        info!(
            labels = resolved.by_label.len(),
            inverse = resolved.inverse_labels().len(),
            "resolved relationship inverse pairs"
        );
        resolved
    }

    /// Whether `label` was declared and selected as forward. `None` when
    /// the label has no declared inverse.
    pub fn is_forward(&self, label: &str) -> Option<bool> {
        self.by_label.get(label).copied()
    }

    /// Whether edges carrying `label` survive pair resolution. Undeclared
    /// labels always pass through.
    pub fn allows(&self, label: &str) -> bool {
        self.by_label.get(label).copied().unwrap_or(true)
    }

    /// Sorted non-forward relation names.
    pub fn inverse_labels(&self) -> Vec<String> {
        let mut inverse: Vec<String> = self
            .by_label
            .iter()
            .filter(|(_, forward)| !**forward)
            .map(|(label, _)| label.clone())
            .collect();
        inverse.sort();
        inverse
    }

    /// Write the sorted inverse relation names to a one-column CSV for
    /// comparison against the manually curated list.
    pub fn write_inverse_audit(&self, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "VALUE")?;
        for label in self.inverse_labels() {
            writeln!(out, "{label}")?;
        }
        out.flush()
    }
}
