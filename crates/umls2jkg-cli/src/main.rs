//! umls2jkg CLI
//!
//! Converts the flat files of a UMLS subset (produced by the MetamorphoSYS
//! application) into a JSON document conforming to the JSON Knowledge
//! Graph (JKG) schema.
//!
//! Expected inputs, relative to the configured `umls_dir`:
//!
//! From the Metathesaurus (`META/`):
//! - MRREL.RRF (relationships)
//! - MRSAB.RRF (sources)
//! - MRSTY.RRF (concept semantic types)
//! - MRCONSO.RRF (concept codes and terms)
//! - MRDEF.RRF (concept definitions)
//! - MRDOC.RRF (documentation, including inverse-relationship pairs)
//!
//! From the Semantic Network (`NET/`):
//! - SRDEF (semantic type descriptions)
//! - SRSTRE1 (fully inherited relation set)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use umls2jkg_config::UmlsConfig;
use umls2jkg_graph::GraphBuilder;
use umls2jkg_jsonout::{JsonDocWriter, JsonFormat};
use umls2jkg_tables::ensure_clean_file;

#[derive(Parser)]
#[command(name = "umls2jkg")]
#[command(version, about = "Convert a UMLS subset into a JSON knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full conversion: build the nodes and rels arrays and write
    /// the output document.
    Convert {
        /// Path to the run configuration (TOML).
        #[arg(short, long)]
        config: PathBuf,

        /// Cap the number of rows scanned per table (smoke runs over
        /// full-size inputs).
        #[arg(long)]
        limit: Option<usize>,

        /// Also emit Semantic Network `isa` edges into the rels array.
        #[arg(long)]
        semantic_rels: bool,
    },

    /// Pre-process a known-malformed file by stripping quote characters,
    /// caching the result in the output directory.
    Clean {
        /// Path to the run configuration (TOML).
        #[arg(short, long)]
        config: PathBuf,

        /// File id to clean, e.g. MRCONSO.
        #[arg(long)]
        file: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            config,
            limit,
            semantic_rels,
        } => cmd_convert(&config, limit, semantic_rels),
        Commands::Clean { config, file } => cmd_clean(&config, &file),
    }
}

fn load_config(path: &Path) -> Result<UmlsConfig> {
    let cfg = UmlsConfig::load(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    fs::create_dir_all(&cfg.directories.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            cfg.directories.output_dir.display()
        )
    })?;
    Ok(cfg)
}

fn cmd_convert(config: &Path, limit: Option<usize>, semantic_rels: bool) -> Result<()> {
    let started = Instant::now();
    let cfg = load_config(config)?;

    println!("{}", "-".repeat(50));
    println!("{}", "UMLS TO JKG CONVERSION".green().bold());
    println!("{}", "-".repeat(50));

    let outpath = cfg.output_path();
    println!("{} {}", "Output file:".bold(), outpath.display());

    let format = JsonFormat {
        pretty: cfg.json_out.pretty,
        indent: cfg.json_out.indent,
    };
    let mut writer = JsonDocWriter::create(&outpath, format)
        .with_context(|| format!("failed to open output file {}", outpath.display()))?;

    let builder = GraphBuilder::new(&cfg, limit).context("failed to prepare source tables")?;

    // Nodes: sources, then semantic-type labels, then relationship labels,
    // then concepts.
    let mut nodes = builder.source_nodes().context("building Source nodes")?;
    nodes.extend(builder.semantic_type_nodes());
    nodes.extend(builder.rel_label_nodes());
    nodes.extend(builder.concept_nodes().context("building Concept nodes")?);
    let written = writer
        .write_array("nodes", nodes)
        .context("writing nodes array")?;
    println!("  {} nodes: {written}", "→".cyan());

    // Rels: optionally the Semantic Network hierarchy, then the
    // concept-concept relationships.
    let mut rels = Vec::new();
    if semantic_rels {
        rels.extend(
            builder
                .semantic_rels()
                .context("building Semantic Network rels")?,
        );
    }
    rels.extend(builder.concept_rels());
    let written = writer
        .write_array("rels", rels)
        .context("writing rels array")?;
    println!("  {} rels: {written}", "→".cyan());

    writer.finish().context("finalizing output document")?;

    println!(
        "{} in {:.2}s",
        "Completed".green().bold(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cmd_clean(config: &Path, file: &str) -> Result<()> {
    let cfg = load_config(config)?;
    let cleaned = ensure_clean_file(&cfg, file)
        .with_context(|| format!("failed to clean file {file}"))?;
    println!("  {} {}", "→".cyan(), cleaned.display());
    Ok(())
}
