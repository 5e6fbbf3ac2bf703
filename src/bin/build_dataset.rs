use anyhow::{Context, Result};
use clap::Parser;
use stormscraper::{cli::Overrides, logging, process};

/// Filter the raw yearly files to one region and write a single Parquet file.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    overrides: Overrides,

    /// Print a per-year row and damage summary after writing.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let config = args
        .overrides
        .resolve()
        .context("resolving configuration")?;

    let report = process::run(&config)
        .with_context(|| format!("building dataset from {}", config.raw_dir.display()))?;

    if args.summary {
        println!("{}", report);
    }
    Ok(())
}
