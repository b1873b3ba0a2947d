use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::crawl::crawl_filetree;
use search_core::tokenizer::query_terms;
use search_core::{InvertedIndex, SearchResult};
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Crawl a directory into an in-memory index and inspect it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print document, term and posting totals as JSON
    Stats {
        /// Directory to crawl
        #[arg(long)]
        root: PathBuf,
    },
    /// Run a query and print one JSON result per line, best first
    Query {
        /// Directory to crawl
        #[arg(long)]
        root: PathBuf,
        /// Maximum number of results to print
        #[arg(long)]
        limit: Option<usize>,
        /// Query terms (all must match)
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct IndexStats {
    documents: usize,
    terms: usize,
    postings: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.command {
        Commands::Stats { root } => {
            let index = load(&root)?;
            serde_json::to_writer_pretty(&mut out, &stats(&index))?;
            writeln!(out)?;
        }
        Commands::Query { root, limit, terms } => {
            let index = load(&root)?;
            let results = run_query(&index, &terms, limit);
            tracing::info!(terms = ?terms, results = results.len(), "query complete");
            for result in results {
                serde_json::to_writer(&mut out, &result)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn load(root: &Path) -> Result<InvertedIndex> {
    let index = crawl_filetree(root).with_context(|| format!("failed to index {}", root.display()))?;
    tracing::info!(
        root = %root.display(),
        documents = index.num_documents(),
        terms = index.num_words(),
        "index loaded"
    );
    Ok(index)
}

fn stats(index: &InvertedIndex) -> IndexStats {
    IndexStats { documents: index.num_documents(), terms: index.num_words(), postings: index.num_postings() }
}

// Arguments are joined and re-split so `"cat dog"` and `cat dog` mean the same.
fn run_query(index: &InvertedIndex, args: &[String], limit: Option<usize>) -> Vec<SearchResult> {
    let terms = query_terms(&args.join(" "));
    let mut results = index.lookup_query(&terms);
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    results
}
