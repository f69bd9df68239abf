//! `taxicab` - search for a^N + b^N = c^N + d^N
//!
//! N, B and the hit budget are fixed at build time (see
//! `taxicab_core::config`).
//!
//! ## Usage
//!
//! ```bash
//! # Search and stream every hit to results.txt
//! taxicab results.txt
//!
//! # Re-check an existing results file
//! taxicab --verify results.txt
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use taxicab_core::config::{BOUND, EXPONENT};
use taxicab_core::{ConsoleStatus, OutputFile, PowerTable, Search, SearchConfig, verify_results};

/// Equal sums of like powers
#[derive(Parser, Debug)]
#[command(name = "taxicab")]
#[command(about = "Find every a^N + b^N = c^N + d^N with 1 <= b <= a <= B and 1 <= d <= c <= B")]
struct Args {
    /// Results file to write (or to read back with --verify)
    output: PathBuf,

    /// Check an existing results file instead of searching
    #[arg(long)]
    verify: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not initialize logging: {err}");
    }

    let result = if args.verify { verify(&args) } else { search(&args) };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn search(args: &Args) -> Result<()> {
    let search = Search::new(SearchConfig::default())?;
    let mut output = OutputFile::create(&args.output)?;

    let summary = search.run(&mut output, &mut ConsoleStatus::stdout())?;
    output.commit()?;

    info!(
        hits = summary.hits,
        path = %args.output.display(),
        termination = ?summary.termination,
        "results written"
    );
    Ok(())
}

fn verify(args: &Args) -> Result<()> {
    let file = File::open(&args.output)
        .with_context(|| format!("Could not open results file: {}", args.output.display()))?;

    println!("Validating solutions");
    let powers = PowerTable::new(EXPONENT, BOUND)?;
    let report = verify_results(BufReader::new(file), &powers)?;

    for (line_no, solution) in &report.invalid {
        warn!(line_no, %solution, "invalid record");
        println!(
            "INVALID SOLUTION (line {}): {}^{n} + {}^{n} = {}^{n} + {}^{n} = {}",
            line_no,
            solution.a,
            solution.b,
            solution.c,
            solution.d,
            solution.sum,
            n = EXPONENT
        );
    }

    println!(
        "Checked {} total solutions, found {} valid solutions ({} distinct sums).",
        report.total,
        report.valid,
        report.sums.len()
    );

    if !report.is_clean() {
        anyhow::bail!("{} invalid records in {}", report.invalid.len(), args.output.display());
    }

    Ok(())
}
