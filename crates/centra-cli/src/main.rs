#![forbid(unsafe_code)]

mod config;
mod output;

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use centra_core::{Graph, closeness_centrality, parse_graph};
use clap::Parser;
use output::{OutputMode, Report};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "centra: find the most central vertex of a weighted digraph",
    long_about = "Read a weighted directed graph, compute closeness centrality for every \
                  vertex and print the id of the most central one.",
    after_help = "INPUT FORMAT:\n    N M\n    from to weight    (M lines)\n\nEXAMPLES:\n    # Read from stdin\n    printf '2 1\\n0 1 1\\n' | centra\n\n    # Read a file with four worker threads\n    centra graph.txt --workers 4\n\n    # Emit machine-readable output with every score\n    centra graph.txt --json --scores"
)]
struct Cli {
    /// Graph input file. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Number of worker threads (0 = available parallelism).
    #[arg(short, long)]
    workers: Option<usize>,

    /// TOML config file with an `[engine]` table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON output instead of the bare vertex id.
    #[arg(long)]
    json: bool,

    /// Include every vertex's score in JSON output.
    #[arg(long, requires = "json")]
    scores: bool,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CENTRA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "centra=debug,info"
        } else {
            "centra=info,warn"
        })
    });

    let format = env::var("CENTRA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // stdout carries only the result.
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

/// Parse the graph from `path`, or from stdin when `path` is `None` or `-`.
fn read_graph(path: Option<&Path>) -> Result<Graph> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            parse_graph(BufReader::new(file))
                .with_context(|| format!("Malformed graph input in {}", path.display()))
        }
        _ => parse_graph(io::stdin().lock()).context("Malformed graph input on stdin"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let engine = config::resolve_engine_config(cli.config.as_deref(), cli.workers)?;
    debug!(?engine, "engine configuration resolved");

    let graph = read_graph(cli.input.as_deref())?;
    let result = closeness_centrality(&graph, &engine).context("Centrality computation failed")?;

    let report = Report::new(&graph, &result, cli.scores);
    output::render(cli.output_mode(), &report, &mut io::stdout().lock())
        .context("Failed to write output")?;

    Ok(())
}
