//! Command-line entry point for the AIG resubstitution optimizer.
//!
//! ```text
//! aigresub <input> [output] [-c N] [-v]... [-s]
//! ```
//!
//! Reads an AIGER file (ASCII or binary, auto-detected), runs one
//! resubstitution pass, and writes the optimized graph back out in
//! binary AIGER. With no explicit output path, `<stem>.resub.aig` next
//! to the input is used.

use std::fs;
use std::path::{Path, PathBuf};

use aigresub_core::{aiger, BruteForceSynthesizer};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

/// AIG resubstitution optimizer.
#[derive(Parser)]
#[command(name = "aigresub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input AIGER file (ASCII or binary)
    input: PathBuf,

    /// Output AIGER file (default: <input stem>.resub.aig)
    output: Option<PathBuf>,

    /// Maximum cut size used for window extraction
    #[arg(short = 'c', long = "cut-size", default_value_t = 4)]
    cut_size: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print optimization statistics to stdout
    #[arg(short = 's', long = "stats")]
    stats: bool,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut path = input.to_path_buf();
    path.set_file_name(stem);
    path.set_extension("resub.aig");
    path
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let data = fs::read(&cli.input)?;
    let mut graph = aiger::read_aiger(&data)?;

    let output = cli.output.clone().unwrap_or_else(|| default_output_path(&cli.input));

    let synthesizer = BruteForceSynthesizer;
    let stats = aigresub_core::run(&mut graph, cli.cut_size, &synthesizer, 4);

    let encoded = aiger::write_binary(&graph);
    fs::write(&output, encoded)?;

    if cli.stats {
        println!("{stats}");
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
