mod config;
mod db;
mod error;
mod extract;
mod fetch;
mod normalize;
mod ontology;
mod record;
mod utils;
mod vocab;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::info;

use config::Settings;
use extract::PageInput;
use normalize::metrics::{new_run_id, PassTracker};
use ontology::serialize::{self, GraphFormat};
use ontology::Namespace;
use record::LanguageRecord;
use vocab::NormalizeRules;

#[derive(Parser)]
#[command(name = "esolang-graph", about = "Esoteric language knowledge graph builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the language list and populate the page queue
    Init,
    /// Fetch unvisited language pages into the page store
    Scrape {
        /// Max pages to fetch (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Assemble records from stored pages into a JSON batch
    Extract {
        /// Max pages to extract (default: all fetched)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fold a second record batch into the raw batch by language name
    Merge {
        /// Batch whose non-empty fields overwrite matching records
        incoming: PathBuf,
        #[arg(short, long)]
        base: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Normalize a raw record batch
    Clean {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the RDF graph from a cleaned batch
    Ontology {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Serialization (default: from output extension, else rdf)
        #[arg(short, long, value_enum)]
        format: Option<GraphFormat>,
    },
    /// Scrape, extract, clean and build the graph in one go
    Run {
        /// Max pages to fetch
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(short, long, value_enum)]
        format: Option<GraphFormat>,
    },
    /// Show page store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Init => init(&settings).await,
        Commands::Scrape { limit } => scrape(&settings, limit).await,
        Commands::Extract { limit, output } => {
            let output = output.unwrap_or_else(|| settings.raw_path());
            extract_stage(&settings, limit, &output)
        }
        Commands::Merge {
            incoming,
            base,
            output,
        } => {
            let base = base.unwrap_or_else(|| settings.raw_path());
            let output = output.unwrap_or_else(|| settings.raw_path());
            merge_stage(&base, &incoming, &output)
        }
        Commands::Clean { input, output } => {
            let input = input.unwrap_or_else(|| settings.raw_path());
            let output = output.unwrap_or_else(|| settings.cleaned_path());
            clean_stage(&input, &output)
        }
        Commands::Ontology {
            input,
            output,
            format,
        } => {
            let input = input.unwrap_or_else(|| settings.cleaned_path());
            let (output, format) = resolve_output(&settings, output, format);
            ontology_stage(&settings, &input, &output, format)
        }
        Commands::Run { limit, format } => {
            scrape(&settings, limit).await?;
            let raw = settings.raw_path();
            let cleaned = settings.cleaned_path();
            extract_stage(&settings, None, &raw)?;
            clean_stage(&raw, &cleaned)?;
            let (output, format) = resolve_output(&settings, None, format);
            ontology_stage(&settings, &cleaned, &output, format)
        }
        Commands::Stats => {
            let conn = db::connect(&settings.store_path())?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Total:     {}", s.total);
            println!("Visited:   {}", s.visited);
            println!("Unvisited: {}", s.unvisited);
            println!("Fetched:   {}", s.fetched);
            println!("Errors:    {}", s.errors);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn init(settings: &Settings) -> anyhow::Result<()> {
    let conn = db::connect(&settings.store_path())?;
    db::init_schema(&conn)?;
    let client = fetch::client(settings)?;
    let url = settings.index_url();
    info!("Fetching language list: {}", url);
    let html = fetch::fetch_text(&client, &url).await?;
    let links = extract::index::extract(&Html::parse_document(&html), &settings.wiki_base_url);
    let inserted = db::insert_links(&conn, &links)?;
    println!("Inserted {} new language URLs ({} total found)", inserted, links.len());
    Ok(())
}

async fn scrape(settings: &Settings, limit: Option<usize>) -> anyhow::Result<()> {
    let conn = db::connect(&settings.store_path())?;
    db::init_schema(&conn)?;
    let pages = db::fetch_unvisited(&conn, limit)?;
    if pages.is_empty() {
        println!("No unvisited pages. Run 'init' first or all pages are fetched.");
        return Ok(());
    }
    println!("Fetching {} pages (streaming to DB)...", pages.len());
    let stats = fetch::fetch_pages_streaming(&conn, pages, settings).await?;
    println!(
        "Done: {} fetched ({} ok, {} errors).",
        stats.total, stats.ok, stats.errors
    );
    Ok(())
}

fn extract_stage(settings: &Settings, limit: Option<usize>, output: &Path) -> anyhow::Result<()> {
    let conn = db::connect(&settings.store_path())?;
    db::init_schema(&conn)?;
    let pages = db::fetch_pages(&conn, limit)?;
    if pages.is_empty() {
        println!("No fetched pages. Run 'scrape' first.");
        return Ok(());
    }
    println!("Extracting {} pages...", pages.len());
    let records = assemble_pages(&pages)?;
    record::save_records(output, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {} records to {}", records.len(), output.display());
    Ok(())
}

fn assemble_pages(pages: &[PageInput]) -> anyhow::Result<Vec<LanguageRecord>> {
    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let mut records = Vec::with_capacity(pages.len());
    for chunk in pages.chunks(500) {
        #[cfg(feature = "rayon")]
        let batch: Vec<LanguageRecord> = {
            use rayon::prelude::*;
            chunk.par_iter().map(extract::assemble).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let batch: Vec<LanguageRecord> = chunk.iter().map(extract::assemble).collect();

        records.extend(batch);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(records)
}

fn merge_stage(base: &Path, incoming: &Path, output: &Path) -> anyhow::Result<()> {
    let records = record::load_records(base)
        .with_context(|| format!("failed to load {}", base.display()))?;
    let extra = record::load_records(incoming)
        .with_context(|| format!("failed to load {}", incoming.display()))?;
    let before = records.len();
    let extra_len = extra.len();
    let merged = record::merge_batches(records, extra);
    record::save_records(output, &merged)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Merged {} records ({} updated, {} added) into {}",
        extra_len,
        extra_len - (merged.len() - before),
        merged.len() - before,
        output.display()
    );
    Ok(())
}

fn clean_stage(input: &Path, output: &Path) -> anyhow::Result<()> {
    let records = record::load_records(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let rules = NormalizeRules::default();
    let mut tracker = PassTracker::new(new_run_id());
    let cleaned = normalize::normalize_batch(records, &rules, &mut tracker);
    tracker.log_summary();
    record::save_records(output, &cleaned)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("{:<32} | {:>7}", tracker.run_id(), "changed");
    println!("{}", "-".repeat(42));
    for m in tracker.metrics() {
        println!("{:<32} | {:>7}", m.pass_name, m.changed);
    }
    println!("\nCleaned {} records into {}", cleaned.len(), output.display());
    Ok(())
}

fn ontology_stage(
    settings: &Settings,
    input: &Path,
    output: &Path,
    format: GraphFormat,
) -> anyhow::Result<()> {
    let records = record::load_records(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let ns = Namespace::new(settings.base_uri.clone());
    let graph = ontology::build_graph(&records, &ns);
    serialize::write_graph(output, &graph, &ns, format)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Graph with {} triples from {} records saved as {}",
        graph.len(),
        records.len(),
        output.display()
    );
    Ok(())
}

/// Explicit format wins, then the output extension, then RDF/XML.
fn resolve_output(
    settings: &Settings,
    output: Option<PathBuf>,
    format: Option<GraphFormat>,
) -> (PathBuf, GraphFormat) {
    match (output, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = GraphFormat::from_path(&path).unwrap_or(GraphFormat::RdfXml);
            (path, format)
        }
        (None, format) => {
            let format = format.unwrap_or(GraphFormat::RdfXml);
            (settings.ontology_path(format.extension()), format)
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
