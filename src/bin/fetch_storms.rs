use anyhow::{Context, Result};
use clap::Parser;
use stormscraper::{cli::Overrides, fetch, logging};
use tracing::info;

/// Download and decompress the newest details file for each configured year.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    overrides: Overrides,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();
    let config = Args::parse()
        .overrides
        .resolve()
        .context("resolving configuration")?;

    let client = fetch::build_client(&config)?;
    let report = fetch::run(&config, &client)
        .await
        .with_context(|| format!("fetching from {}", config.base_url))?;

    for f in &report.fetched {
        info!(year = f.year, csv = %f.csv_path.display(), download = ?f.download, unzip = ?f.unzip, "ready");
    }
    Ok(())
}
