use anyhow::{Context, Result};
use clap::Parser;
use stormscraper::{cli::Overrides, fetch, logging, process};
use tracing::{error, info};

/// Fetch the raw storm-event files, then build the regional dataset.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    overrides: Overrides,

    /// Print a per-year row and damage summary after writing.
    #[arg(long)]
    summary: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    let args = Args::parse();
    let config = args.overrides.resolve().context("resolving configuration")?;
    info!(?config, "startup");

    // ─── 2) fetch raw files ──────────────────────────────────────────
    let client = fetch::build_client(&config)?;
    let fetched = fetch::run(&config, &client)
        .await
        .inspect_err(|e| error!("fetch failed: {}", e))
        .context("fetch stage")?;
    info!(
        fetched = fetched.fetched.len(),
        missing = ?fetched.missing,
        "raw files ready"
    );

    // ─── 3) transform on the blocking pool ───────────────────────────
    let report = tokio::task::spawn_blocking({
        let config = config.clone();
        move || process::run(&config)
    })
    .await?
    .inspect_err(|e| error!("transform failed: {}", e))
    .context("transform stage")?;

    if args.summary {
        println!("{}", report);
    }
    info!("all done");
    Ok(())
}
