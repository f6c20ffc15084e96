//! glyphbase CLI - search, stream, and validate the emoji catalog processor

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

mod commands;
mod logging;

use commands::{cmd_bench, cmd_search, cmd_stats, cmd_stream, cmd_validate};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "glyphbase")]
#[command(about = "Search, stream, and validate the emoji catalog processor")]
#[command(after_help = "\
EXAMPLES:
  glyphbase search happy --limit 5     # Top 5 matches for \"happy\"
  glyphbase stream --limit 10          # First 10 derived records
  glyphbase validate --json            # Run the validation suite")]
struct Cli {
  /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it.
  #[arg(long, global = true, default_value = "info")]
  log_level: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the processor validation suite
  Validate {
    /// Time budget per test case, in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Search subcategory names
  Search {
    /// Search query
    query: String,
    /// Restrict to one category
    #[arg(short, long)]
    category: Option<String>,
    /// Restrict to one subcategory
    #[arg(short, long)]
    subcategory: Option<String>,
    /// Maximum results (0 = unlimited)
    #[arg(short, long, default_value = "10")]
    limit: usize,
  },
  /// Stream derived records for the catalog
  Stream {
    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,
  },
  /// Stream the catalog once and print statistics
  Stats,
  /// Run the concurrent query worker pool
  Bench {
    #[arg(short, long, default_value = "5")]
    workers: usize,
    /// Queries per worker
    #[arg(short, long, default_value = "20")]
    queries: usize,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(&cli.log_level);

  let cancel = CancellationToken::new();
  tokio::spawn({
    let cancel = cancel.clone();
    async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupt received, cancelling");
        cancel.cancel();
      }
    }
  });

  match cli.command {
    Commands::Validate { timeout_secs, json } => cmd_validate(timeout_secs, json, cancel).await,
    Commands::Search {
      query,
      category,
      subcategory,
      limit,
    } => cmd_search(&query, category, subcategory, limit),
    Commands::Stream { limit } => cmd_stream(limit, cancel).await,
    Commands::Stats => cmd_stats(cancel).await,
    Commands::Bench { workers, queries } => cmd_bench(workers, queries, cancel).await,
  }
}
