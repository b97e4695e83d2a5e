//! Command-line driver: reads cases from a file or stdin and prints one
//! total per operation.

use anyhow::Context;
use clap::Parser;
use recur::{Alphabet, EngineConfig, SessionConfig};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recur")]
#[command(version)]
#[command(about = "Count repeated substrings under appends and undos", long_about = None)]
struct Cli {
    /// Input file (defaults to stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Accepted symbols: lowercase, ascii or unicode
    #[arg(short, long, default_value = "lowercase")]
    alphabet: Alphabet,

    /// Command character that undoes the last append
    #[arg(short, long, default_value_t = '-')]
    undo_symbol: char,

    /// Expected number of appends per case
    #[arg(long, default_value_t = 0)]
    capacity_hint: usize,

    /// Print engine statistics of the last case to stderr as JSON
    #[arg(long)]
    stats: bool,

    /// Log every append and undo to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "recur=debug" } else { "recur=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig {
        engine: EngineConfig {
            alphabet: cli.alphabet,
            capacity_hint: cli.capacity_hint,
        },
        undo_symbol: cli.undo_symbol,
    };

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());
    let summary = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            recur::session::run(BufReader::new(file), writer, &config)
        }
        None => recur::session::run(io::stdin().lock(), writer, &config),
    }
    .context("session failed")?;

    tracing::info!(
        cases = summary.cases,
        appends = summary.appends,
        undos = summary.undos,
        "done"
    );
    if cli.stats {
        let json = serde_json::to_string_pretty(&summary.last_case)?;
        eprintln!("{}", json);
    }
    Ok(())
}
