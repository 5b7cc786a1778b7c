//! Assembly of the JKG node and relationship collections.
//!
//! `GraphBuilder::new` reads the tables shared by several collections once
//! (concept-concept relationships, concept-code relationships, semantic
//! definitions, and the resolved inverse pairs); the per-collection methods
//! then shape rows into [`JkgNodeV1`]/[`JkgRelV1`] values.
//!
//! Collection rules worth calling out:
//!
//! - Concept nodes are the inner join of the semantic-type aggregation and
//!   the preferred-term selection: a concept with a preferred term but no
//!   semantic-type assignment is dropped on purpose.
//! - Concept-concept edges keep the relational record's object (CUI2) as
//!   the edge `start` and its subject (CUI1) as the edge `end`; that
//!   reversal is the interchange schema's convention.
//! - Every identifier that originates in a vocabulary code goes through
//!   the standardizer; concept and relation ids carry the fixed `UMLS`
//!   prefix.

use crate::relations::ForwardRelationships;
use crate::schema::{JkgNodeV1, JkgRelV1, NodePropertiesV1};
use crate::standardize::{create_code_id, standardize_code_id, standardize_term};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;
use umls2jkg_config::UmlsConfig;
use umls2jkg_tables::{Table, TableError, TableScan};

const UMLS_SAB: &str = "UMLS";
const LABEL_CONCEPT: &str = "Concept";
const LABEL_SOURCE: &str = "Source";
const LABEL_NODE_LABEL: &str = "Node_Label";
const LABEL_REL_LABEL: &str = "Rel_Label";

/// SRDEF record type marking a semantic type.
const RECORD_TYPE_STY: &str = "STY";
/// Semantic Network UI of the `isa` relation.
const ISA_RELATION_UI: &str = "T186";

const INVERSE_AUDIT_FILE: &str = "inverse_relationships.csv";

/// Compact id under the fixed knowledge-source prefix.
fn umls_id(code: &str) -> String {
    standardize_code_id(&create_code_id(UMLS_SAB, code))
}

fn progress(len: u64, msg: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {pos:>9}/{len:9}")
            .expect("progress template"),
    );
    bar.set_message(msg);
    bar
}

pub struct GraphBuilder<'a> {
    cfg: &'a UmlsConfig,
    limit: Option<usize>,
    forward: ForwardRelationships,
    /// CUI1, CUI2, REL, RELA, SAB, rel_label — pair-resolved and restricted
    /// to English-language sources.
    concept_rels: Table,
    /// MRCONSO joined with MRDEF definitions, plus the standardized codeid.
    concept_code_rels: Table,
    /// RT, UI, STY_RL, DEF from SRDEF.
    semantic_definitions: Table,
}

impl<'a> GraphBuilder<'a> {
    /// Read the shared tables and resolve inverse pairs. Also writes the
    /// inverse-relationship audit list into the output directory.
    pub fn new(cfg: &'a UmlsConfig, limit: Option<usize>) -> Result<Self, TableError> {
        info!("building information on relationship inverse pairs");
        let mrdoc = TableScan::new(cfg, "MRDOC").collect()?;
        let forward = ForwardRelationships::from_inverse_pairs(&mrdoc);
        forward.write_inverse_audit(&cfg.directories.output_dir.join(INVERSE_AUDIT_FILE))?;

        info!("building information on concept-concept relationships");
        let concept_rels = build_concept_rels(cfg, limit, &forward)?;

        info!("building data for concept-code relationships");
        let concept_code_rels = build_concept_code_rels(cfg, limit)?;

        info!("reading semantic network definitions");
        let semantic_definitions = TableScan::new(cfg, "SRDEF")
            .select(&["RT", "UI", "STY_RL", "DEF"])
            .limit(limit)
            .collect()?;

        Ok(Self {
            cfg,
            limit,
            forward,
            concept_rels,
            concept_code_rels,
            semantic_definitions,
        })
    }

    pub fn forward(&self) -> &ForwardRelationships {
        &self.forward
    }

    /// Source nodes: the two injected registry entries, then one node per
    /// source-registry row, sorted by root source abbreviation.
    pub fn source_nodes(&self) -> Result<Vec<JkgNodeV1>, TableError> {
        let table = TableScan::new(self.cfg, "MRSAB")
            .select(&["VSAB", "RSAB", "SON", "SRL", "TTYL"])
            .limit(self.limit)
            .collect()?;

        let mut rows: Vec<Vec<Option<String>>> =
            table.rows().map(|r| r.cells().to_vec()).collect();
        let rsab_idx = table.column_index("RSAB").expect("RSAB selected");
        rows.sort_by(|a, b| a[rsab_idx].cmp(&b[rsab_idx]));
        let sorted = Table::new(table.columns().to_vec(), rows);

        let mut nodes = vec![
            JkgNodeV1 {
                labels: vec![LABEL_SOURCE.to_string()],
                properties: NodePropertiesV1 {
                    id: "UMLS:UMLS".to_string(),
                    name: Some("Unified Medical Language System".to_string()),
                    description: Some(
                        "United States National Institutes of Health (NIH) National Library \
                         of Medicine (NLM) Unified Medical Language System (UMLS) Knowledge \
                         Sources."
                            .to_string(),
                    ),
                    sab: Some(UMLS_SAB.to_string()),
                    source: Some(
                        "http://www.nlm.nih.gov/research/umls/licensedcontent/umlsknowledgesources.html"
                            .to_string(),
                    ),
                    ..Default::default()
                },
            },
            JkgNodeV1 {
                labels: vec![LABEL_SOURCE.to_string()],
                properties: NodePropertiesV1 {
                    id: "UMLS:NDC".to_string(),
                    name: Some("National Drug Codes".to_string()),
                    sab: Some("NDC".to_string()),
                    ..Default::default()
                },
            },
        ];

        let bar = progress(sorted.len() as u64, "Building Source nodes");
        for row in sorted.rows() {
            bar.inc(1);
            let vsab = match row.get("VSAB") {
                Some(v) => v,
                None => continue,
            };
            let ttyl = row
                .get("TTYL")
                .map(|t| t.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            nodes.push(JkgNodeV1 {
                labels: vec![LABEL_SOURCE.to_string()],
                properties: NodePropertiesV1 {
                    id: umls_id(vsab),
                    name: row.get("SON").map(str::to_string),
                    sab: row.get("RSAB").map(str::to_string),
                    srl: row.get("SRL").map(str::to_string),
                    ttyl: Some(ttyl),
                    ..Default::default()
                },
            });
        }
        bar.finish_and_clear();

        Ok(nodes)
    }

    /// Node_Label nodes, one per semantic-type definition.
    pub fn semantic_type_nodes(&self) -> Vec<JkgNodeV1> {
        let bar = progress(
            self.semantic_definitions.len() as u64,
            "Building Semantic Network Node_Label nodes",
        );
        let nodes = self
            .semantic_definitions
            .rows()
            .inspect(|_| bar.inc(1))
            .filter(|row| row.get("RT") == Some(RECORD_TYPE_STY))
            .filter_map(|row| {
                let ui = row.get("UI")?;
                Some(JkgNodeV1 {
                    labels: vec![LABEL_NODE_LABEL.to_string()],
                    properties: NodePropertiesV1 {
                        id: umls_id(ui),
                        def: row.get("DEF").map(str::to_string),
                        node_label: row.get("STY_RL").map(str::to_string),
                        sab: Some(UMLS_SAB.to_string()),
                        ..Default::default()
                    },
                })
            })
            .collect();
        bar.finish_and_clear();
        nodes
    }

    /// Rel_Label nodes: the distinct relation labels observed in the
    /// pair-resolved concept-concept set, ascending.
    pub fn rel_label_nodes(&self) -> Vec<JkgNodeV1> {
        let labels: BTreeSet<String> = self
            .concept_rels
            .rows()
            .filter_map(|row| row.get("rel_label").map(str::to_string))
            .collect();

        let bar = progress(labels.len() as u64, "Building Rel_Label nodes");
        let nodes = labels
            .into_iter()
            .map(|label| {
                bar.inc(1);
                JkgNodeV1 {
                    labels: vec![LABEL_REL_LABEL.to_string()],
                    properties: NodePropertiesV1 {
                        id: umls_id(&label),
                        def: Some(label.clone()),
                        rel_label: Some(label),
                        sab: Some(UMLS_SAB.to_string()),
                        ..Default::default()
                    },
                }
            })
            .collect();
        bar.finish_and_clear();
        nodes
    }

    /// Semantic-type label lists per concept: group MRSTY by CUI in
    /// first-seen order, drop null types, dedup, and prepend "Concept".
    fn concept_labels(&self) -> Result<HashMap<String, Vec<String>>, TableError> {
        let mrsty = TableScan::new(self.cfg, "MRSTY")
            .select(&["CUI", "STY"])
            .limit(self.limit)
            .collect()?;

        let mut labels: HashMap<String, Vec<String>> = HashMap::new();
        for row in mrsty.rows() {
            let cui = match row.get("CUI") {
                Some(c) => c,
                None => continue,
            };
            let list = labels
                .entry(cui.to_string())
                .or_insert_with(|| vec![LABEL_CONCEPT.to_string()]);
            if let Some(sty) = row.get("STY") {
                if !list.iter().any(|l| l == sty) {
                    list.push(sty.to_string());
                }
            }
        }
        Ok(labels)
    }

    /// Concept nodes: preferred-term rows inner-joined against the
    /// semantic-type aggregation, one node per concept.
    pub fn concept_nodes(&self) -> Result<Vec<JkgNodeV1>, TableError> {
        let labels = self.concept_labels()?;

        let bar = progress(self.concept_code_rels.len() as u64, "Building Concept nodes");
        let mut seen_cuis: HashSet<&str> = HashSet::new();
        let mut nodes = Vec::new();
        for row in self.concept_code_rels.rows() {
            bar.inc(1);
            if row.get("ISPREF") != Some("Y")
                || row.get("STT") != Some("PF")
                || row.get("TS") != Some("P")
            {
                continue;
            }
            let cui = match row.get("CUI") {
                Some(c) => c,
                None => continue,
            };
            if !seen_cuis.insert(cui) {
                continue;
            }
            // Inner join: no semantic-type aggregation, no node.
            let Some(label_list) = labels.get(cui) else {
                continue;
            };
            nodes.push(JkgNodeV1 {
                labels: label_list.clone(),
                properties: NodePropertiesV1 {
                    id: umls_id(cui),
                    pref_term: row.get("STR").map(str::to_string),
                    sab: Some(UMLS_SAB.to_string()),
                    ..Default::default()
                },
            });
        }
        bar.finish_and_clear();

        info!(concepts = nodes.len(), "built concept nodes");
        Ok(nodes)
    }

    /// Concept-concept edges from the pair-resolved relationship table.
    pub fn concept_rels(&self) -> Vec<JkgRelV1> {
        let bar = progress(
            self.concept_rels.len() as u64,
            "Building concept-concept rels",
        );
        let rels = self
            .concept_rels
            .rows()
            .inspect(|_| bar.inc(1))
            .filter_map(|row| {
                let label = row.get("rel_label")?;
                let cui1 = row.get("CUI1")?;
                let cui2 = row.get("CUI2")?;
                let sab = row.get("SAB")?;
                // CUI2 is the start concept, CUI1 the end concept.
                Some(JkgRelV1::new(
                    label.to_string(),
                    umls_id(cui2),
                    umls_id(cui1),
                    sab.to_string(),
                ))
            })
            .collect();
        bar.finish_and_clear();
        rels
    }

    /// Semantic Network `isa` edges: the inherited relation set restricted
    /// to the basic hierarchy, joined against the semantic definitions.
    pub fn semantic_rels(&self) -> Result<Vec<JkgRelV1>, TableError> {
        let srstre = TableScan::new(self.cfg, "SRSTRE1")
            .select(&["UI1", "UI2", "UI3"])
            .limit(self.limit)
            .collect()?;

        let mut isa_targets: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in srstre.rows() {
            if row.get("UI2") != Some(ISA_RELATION_UI) {
                continue;
            }
            if let (Some(ui1), Some(ui3)) = (row.get("UI1"), row.get("UI3")) {
                isa_targets.entry(ui1).or_default().push(ui3);
            }
        }

        let mut pairs: Vec<(String, String)> = self
            .semantic_definitions
            .rows()
            .filter_map(|row| row.get("UI"))
            .flat_map(|ui| {
                isa_targets
                    .get(ui)
                    .into_iter()
                    .flatten()
                    .map(move |ui3| (ui.to_string(), ui3.to_string()))
            })
            .collect();
        pairs.sort();

        Ok(pairs
            .into_iter()
            .map(|(ui, ui3)| {
                JkgRelV1::new("isa".to_string(), umls_id(&ui), umls_id(&ui3), UMLS_SAB.to_string())
            })
            .collect())
    }
}

/// MRREL restricted to English-language sources, with the derived
/// `rel_label` column (`RELA` if present, else `REL`) and the inverse
/// members of declared pairs removed.
fn build_concept_rels(
    cfg: &UmlsConfig,
    limit: Option<usize>,
    forward: &ForwardRelationships,
) -> Result<Table, TableError> {
    let col_rels = ["CUI1", "CUI2", "REL", "RELA", "SAB"];
    let mrrel = TableScan::new(cfg, "MRREL")
        .select(&col_rels)
        .limit(limit)
        .collect()?;

    // English-language sources; MRSAB's language filter applies on read.
    let mrsab = TableScan::new(cfg, "MRSAB").select(&["RSAB"]).collect()?;
    let english_sabs: HashSet<&str> = mrsab.rows().filter_map(|r| r.get("RSAB")).collect();

    let mut columns: Vec<String> = col_rels.iter().map(|c| c.to_string()).collect();
    columns.push("rel_label".to_string());
    let mut out = Table::new(columns, Vec::new());
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();

    for row in mrrel.rows() {
        let sab = match row.get("SAB") {
            Some(s) if english_sabs.contains(s) => s,
            _ => continue,
        };
        let rela = row.get("RELA");
        if let Some(rela) = rela {
            if !forward.allows(rela) {
                continue;
            }
        }
        let rel_label = rela.or_else(|| row.get("REL"));
        let cells = vec![
            row.get("CUI1").map(str::to_string),
            row.get("CUI2").map(str::to_string),
            row.get("REL").map(str::to_string),
            rela.map(str::to_string),
            Some(sab.to_string()),
            rel_label.map(str::to_string),
        ];
        if seen.insert(cells.clone()) {
            out.push_row(cells);
        }
    }

    info!(edges = out.len(), "concept-concept relationships prepared");
    Ok(out)
}

/// MRCONSO left-joined with MRDEF definitions on the atom identifier, with
/// the standardized `codeid` column and CURIE-shaped terms marked.
fn build_concept_code_rels(cfg: &UmlsConfig, limit: Option<usize>) -> Result<Table, TableError> {
    let col_conso = ["STR", "SAB", "CODE", "TTY", "CUI", "AUI", "ISPREF", "STT", "TS"];
    // MRCONSO and MRDEF both carry fields with unescaped quotes; route the
    // reads through the cleaning cache.
    let mrconso = TableScan::new(cfg, "MRCONSO")
        .select(&col_conso)
        .clean_file(true)
        .limit(limit)
        .collect()?;
    let mrdef = TableScan::new(cfg, "MRDEF")
        .select(&["AUI", "DEF"])
        .clean_file(true)
        .limit(limit)
        .collect()?;

    let mut definitions: HashMap<&str, Vec<Option<&str>>> = HashMap::new();
    for row in mrdef.rows() {
        if let Some(aui) = row.get("AUI") {
            definitions.entry(aui).or_default().push(row.get("DEF"));
        }
    }

    let mut columns: Vec<String> = col_conso.iter().map(|c| c.to_string()).collect();
    columns.push("DEF".to_string());
    columns.push("codeid".to_string());
    let mut out = Table::new(columns, Vec::new());

    let bar = progress(mrconso.len() as u64, "Joining concept-code relationships");
    for row in mrconso.rows() {
        bar.inc(1);
        let codeid = match (row.get("SAB"), row.get("CODE")) {
            (Some(sab), Some(code)) => Some(standardize_code_id(&create_code_id(sab, code))),
            _ => None,
        };
        let term = row.get("STR").map(standardize_term);

        let base = |def: Option<String>| {
            vec![
                term.clone(),
                row.get("SAB").map(str::to_string),
                row.get("CODE").map(str::to_string),
                row.get("TTY").map(str::to_string),
                row.get("CUI").map(str::to_string),
                row.get("AUI").map(str::to_string),
                row.get("ISPREF").map(str::to_string),
                row.get("STT").map(str::to_string),
                row.get("TS").map(str::to_string),
                def,
                codeid.clone(),
            ]
        };

        match row.get("AUI").and_then(|aui| definitions.get(aui)) {
            Some(defs) => {
                for def in defs {
                    out.push_row(base(def.map(str::to_string)));
                }
            }
            None => out.push_row(base(None)),
        }
    }
    bar.finish_and_clear();

    info!(rows = out.len(), "concept-code relationships prepared");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    /// Write one source file under the fixture layout (`NET/` for `SR*`,
    /// `META/*.RRF` otherwise).
    fn write_source(umls_dir: &Path, file_id: &str, lines: &[&str]) {
        let path = if file_id.starts_with("SR") {
            umls_dir.join("NET").join(file_id)
        } else {
            umls_dir.join("META").join(format!("{file_id}.RRF"))
        };
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        let mut f = fs::File::create(path).expect("create");
        for line in lines {
            writeln!(f, "{line}").expect("write");
        }
    }

    fn fixture_config(umls_dir: &Path, output_dir: &Path) -> UmlsConfig {
        let text = format!(
            r#"
[directories]
umls_dir = "{}"
output_dir = "{}"

[json_out]
pretty = false
indent = 4
output_filename = "jkg.json"

[columns]
MRDOC = "DOCKEY,VALUE,TYPE,EXPL"
MRREL = "CUI1,AUI1,STYPE1,REL,CUI2,AUI2,STYPE2,RELA,RUI,SRUI,SAB,SL,RG,DIR,SUPPRESS,CVF"
MRSAB = "VCUI,RCUI,VSAB,RSAB,SON,SF,SVER,VSTART,VEND,IMETA,RMETA,SLC,SCC,SRL,TFR,CFR,CXTY,TTYL,ATNL,LAT,CENC,CURVER,SABIN,SSN,SCIT"
MRCONSO = "CUI,LAT,TS,LUI,STT,SUI,ISPREF,AUI,SAUI,SCUI,SDUI,SAB,TTY,CODE,STR,SRL,SUPPRESS,CVF"
MRDEF = "CUI,AUI,ATUI,SATUI,SAB,DEF,SUPPRESS,CVF"
MRSTY = "CUI,TUI,STN,STY,ATUI,CVF"
SRDEF = "RT,UI,STY_RL,STN_RTN,DEF,EX,UN,NH,ABR,RIN"
SRSTRE1 = "UI1,UI2,UI3"

[rowsizes]
MRDOC = 40
MRREL = 40
MRSAB = 80
MRCONSO = 80
MRDEF = 60
MRSTY = 40
SRDEF = 80
SRSTRE1 = 30
"#,
            umls_dir.display(),
            output_dir.display()
        );
        toml::from_str(&text).expect("config")
    }

    /// A minimal but complete MetamorphoSYS-shaped subset.
    fn fixture(umls_dir: &Path) {
        write_source(
            umls_dir,
            "MRDOC",
            &[
                "RELA|has_nerve_supply|rela_inverse|nerve_supply_of|",
                "RELA|nerve_supply_of|rela_inverse|has_nerve_supply|",
                "RELA|expanded_form|expanded_form|Expanded form|",
            ],
        );
        write_source(
            umls_dir,
            "MRSAB",
            &[
                // SNOMEDCT_US: English; MSHFRE: French (dropped on read);
                // LNC: English with no term-type list.
                "C001|C002|SNOMEDCT_US_2024|SNOMEDCT_US|SNOMED CT US|SCT|2024|||||||0|100|200|FULL|PN,FN||ENG|UTF-8|Y|Y|sct|cit|",
                "C003|C004|MSHFRE_2024|MSHFRE|MeSH French|MSH|2024|||||||0|10|20|FULL|PN||FRE|UTF-8|Y|Y|msh|cit|",
                "C005|C006|LNC_2024|LNC|LOINC|LNC|2024|||||||0|50|60|FULL|||ENG|UTF-8|Y|Y|lnc|cit|",
            ],
        );
        write_source(
            umls_dir,
            "MRREL",
            &[
                // Forward RELA: kept.
                "C0000001|A1|CUI|RO|C0000002|A2|CUI|nerve_supply_of|R1||SNOMEDCT_US|SNOMEDCT_US||N|N||",
                // Inverse RELA: dropped by pair resolution.
                "C0000002|A2|CUI|RO|C0000001|A1|CUI|has_nerve_supply|R2||SNOMEDCT_US|SNOMEDCT_US||N|N||",
                // Null RELA: label falls back to REL.
                "C0000001|A1|CUI|CHD|C0000003|A3|CUI||R3||SNOMEDCT_US|SNOMEDCT_US||N|N||",
                // Non-English SAB: dropped by the source join.
                "C0000001|A1|CUI|RO|C0000002|A2|CUI|nerve_supply_of|R4||MSHFRE|MSHFRE||N|N||",
            ],
        );
        write_source(
            umls_dir,
            "MRCONSO",
            &[
                "C0000001|ENG|P|L1|PF|S1|Y|A1||||SNOMEDCT_US|PT|100001|Epilepsy|0|N||",
                // Secondary atom for the same concept: not preferred.
                "C0000001|ENG|S|L2|VF|S2|N|A9||||SNOMEDCT_US|SY|100001|Epilepsia|0|N||",
                "C0000002|ENG|P|L3|PF|S3|Y|A2||||SNOMEDCT_US|PT|100002|Facial nerve|0|N||",
                // Preferred but no MRSTY assignment: dropped by the join.
                "C0000009|ENG|P|L9|PF|S9|Y|A9b||||SNOMEDCT_US|PT|100009|Orphan concept|0|N||",
                // Term that resembles a CURIE.
                "C0000003|ENG|P|L4|PF|S4|Y|A3||||SNOMEDCT_US|PT|GO:GO:0001|HP:0001250|0|N||",
            ],
        );
        write_source(
            umls_dir,
            "MRDEF",
            &["C0000001|A1|AT1||SNOMEDCT_US|A seizure disorder.|N||"],
        );
        write_source(
            umls_dir,
            "MRSTY",
            &[
                "C0000001|T047|B2.2|Disease or Syndrome|AT01||",
                "C0000001|T047|B2.2|Disease or Syndrome|AT02||",
                "C0000002|T023|A1.2|Body Part, Organ, or Organ Component|AT03||",
                // Empty semantic type normalizes to null, never an empty label.
                "C0000003|T000|A0||AT04||",
            ],
        );
        write_source(
            umls_dir,
            "SRDEF",
            &[
                "STY|T047|Disease or Syndrome|B2.2.1.2.1|A condition which alters health.||||dsyn||",
                "STY|T023|Body Part, Organ, or Organ Component|A1.2.3.1|A collection of cells.||||bpoc||",
                "RL|T186|isa|||||||",
            ],
        );
        write_source(
            umls_dir,
            "SRSTRE1",
            &["T047|T186|T023|", "T023|T186|T047|", "T047|T186|T047|"],
        );
    }

    fn builder_fixture() -> (tempfile::TempDir, tempfile::TempDir) {
        let umls = tempfile::tempdir().expect("tempdir");
        let out = tempfile::tempdir().expect("tempdir");
        fixture(umls.path());
        (umls, out)
    }

    #[test]
    fn pair_resolution_filters_inverse_edges_and_keeps_pass_through() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let rels = builder.concept_rels();
        let labels: Vec<&str> = rels.iter().map(|r| r.label.as_str()).collect();
        assert!(labels.contains(&"nerve_supply_of"));
        assert!(!labels.contains(&"has_nerve_supply"));
        // Null RELA falls back to REL and passes through unfiltered.
        assert!(labels.contains(&"CHD"));
        // The French-source row is gone entirely.
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn edge_start_is_cui2_and_end_is_cui1() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let rels = builder.concept_rels();
        let rel = rels
            .iter()
            .find(|r| r.label == "nerve_supply_of")
            .expect("edge");
        assert_eq!(rel.start.properties.id, "UMLS:C0000002");
        assert_eq!(rel.end.properties.id, "UMLS:C0000001");
        assert_eq!(rel.properties.sab, "SNOMEDCT_US");
    }

    #[test]
    fn source_nodes_start_with_injected_registry_entries() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let nodes = builder.source_nodes().expect("source nodes");
        assert_eq!(nodes[0].properties.id, "UMLS:UMLS");
        assert_eq!(nodes[1].properties.id, "UMLS:NDC");
        // Only the English registry rows survive the language filter,
        // sorted by root source abbreviation.
        assert_eq!(nodes.len(), 4);
        let lnc = &nodes[2];
        assert_eq!(lnc.properties.id, "UMLS:LNC_2024");
        // A null term-type field yields an empty list, not a missing key.
        assert_eq!(lnc.properties.ttyl, Some(Vec::<String>::new()));
        let sct = &nodes[3];
        assert_eq!(sct.labels, vec!["Source"]);
        assert_eq!(sct.properties.id, "UMLS:SNOMEDCT_US_2024");
        assert_eq!(sct.properties.sab.as_deref(), Some("SNOMEDCT_US"));
        assert_eq!(sct.properties.srl.as_deref(), Some("0"));
        assert_eq!(
            sct.properties.ttyl.as_deref(),
            Some(&["PN".to_string(), "FN".to_string()][..])
        );
    }

    #[test]
    fn semantic_type_nodes_keep_only_sty_records() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let nodes = builder.semantic_type_nodes();
        let ids: Vec<&str> = nodes.iter().map(|n| n.properties.id.as_str()).collect();
        assert!(ids.contains(&"UMLS:T047"));
        assert!(ids.contains(&"UMLS:T023"));
        // The RL record (isa itself) is not a semantic type.
        assert_eq!(nodes.len(), 2);
        let dsyn = nodes
            .iter()
            .find(|n| n.properties.id == "UMLS:T047")
            .expect("dsyn");
        assert_eq!(dsyn.labels, vec!["Node_Label"]);
        assert_eq!(
            dsyn.properties.node_label.as_deref(),
            Some("Disease or Syndrome")
        );
    }

    #[test]
    fn rel_label_nodes_are_distinct_and_sorted() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let nodes = builder.rel_label_nodes();
        let labels: Vec<&str> = nodes
            .iter()
            .filter_map(|n| n.properties.rel_label.as_deref())
            .collect();
        assert_eq!(labels, vec!["CHD", "nerve_supply_of"]);
        assert_eq!(nodes[0].properties.id, "UMLS:CHD");
    }

    #[test]
    fn concept_labels_start_with_concept_and_dedup() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let nodes = builder.concept_nodes().expect("concept nodes");
        let epilepsy = nodes
            .iter()
            .find(|n| n.properties.id == "UMLS:C0000001")
            .expect("epilepsy");
        // Duplicate MRSTY assignment collapsed; "Concept" leads.
        assert_eq!(epilepsy.labels, vec!["Concept", "Disease or Syndrome"]);
        assert_eq!(epilepsy.properties.pref_term.as_deref(), Some("Epilepsy"));

        // Empty STY yields the bare generic label, never an empty string.
        let curie_like = nodes
            .iter()
            .find(|n| n.properties.id == "UMLS:C0000003")
            .expect("curie-like");
        assert_eq!(curie_like.labels, vec!["Concept"]);
        // Its CURIE-shaped preferred term got the trailing-colon marker.
        assert_eq!(
            curie_like.properties.pref_term.as_deref(),
            Some("HP:0001250:")
        );
    }

    #[test]
    fn concept_without_semantic_assignment_is_dropped_by_the_join() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let nodes = builder.concept_nodes().expect("concept nodes");
        assert!(nodes
            .iter()
            .all(|n| n.properties.id != "UMLS:C0000009"));
        // One node per surviving concept, preferred atoms only.
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn semantic_rels_follow_the_basic_hierarchy_only() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let builder = GraphBuilder::new(&cfg, None).expect("builder");

        let rels = builder.semantic_rels().expect("semantic rels");
        assert_eq!(rels.len(), 3);
        assert!(rels.iter().all(|r| r.label == "isa"));
        assert!(rels.iter().all(|r| r.properties.sab == "UMLS"));
        // Sorted by (start UI, end UI); start carries the definition row's UI.
        assert_eq!(rels[0].start.properties.id, "UMLS:T023");
        assert_eq!(rels[0].end.properties.id, "UMLS:T047");
    }

    #[test]
    fn inverse_audit_file_lands_in_the_output_directory() {
        let (umls, out) = builder_fixture();
        let cfg = fixture_config(umls.path(), out.path());
        let _builder = GraphBuilder::new(&cfg, None).expect("builder");

        let text =
            fs::read_to_string(out.path().join("inverse_relationships.csv")).expect("audit file");
        assert_eq!(text, "VALUE\nhas_nerve_supply\n");
    }
}
