// src/fetch/mod.rs

pub mod download;
pub mod gunzip;
pub mod listing;
#[cfg(test)]
pub(crate) mod test_server;

use reqwest::Client;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument, warn};

pub use download::{download_file, Outcome};
pub use gunzip::gunzip_file;
pub use listing::{build_latest_file_map, fetch_directory_listing, latest_details_files};

use crate::{config::Config, error::Result};

/// Raw file pair produced for one year.
#[derive(Debug, Clone)]
pub struct FetchedYear {
    pub year: i32,
    pub gz_path: PathBuf,
    pub csv_path: PathBuf,
    pub download: Outcome,
    pub unzip: Outcome,
}

#[derive(Debug, Default)]
pub struct FetchReport {
    pub fetched: Vec<FetchedYear>,
    /// Configured years with no entry in the remote listing.
    pub missing: Vec<i32>,
}

/// HTTP client with the configured per-request timeout.
pub fn build_client(config: &Config) -> Result<Client> {
    Ok(Client::builder().timeout(config.http_timeout()).build()?)
}

/// List, select, download and decompress every configured year in order.
///
/// Listing failures abort before any file is touched. A failed download or
/// decompression stops the run at that year.
#[instrument(level = "info", skip_all, fields(start = config.start_year, end = config.end_year))]
pub async fn run(config: &Config, client: &Client) -> Result<FetchReport> {
    let base = config.listing_url()?;
    fs::create_dir_all(&config.raw_dir).await?;

    let html = fetch_directory_listing(client, &base).await?;
    let latest = latest_details_files(&html)?;
    info!(years = latest.len(), "resolved latest revisions");

    let mut report = FetchReport {
        missing: config
            .years()
            .filter(|y| !latest.contains_key(y))
            .collect(),
        ..FetchReport::default()
    };
    if !report.missing.is_empty() {
        warn!(missing = ?report.missing, "no matching details files for some years");
    }

    for year in config.years() {
        let Some(file) = latest.get(&year) else {
            continue;
        };
        let url = base.join(&file.name)?;
        let gz_path = config.raw_dir.join(&file.name);
        let csv_path = config.raw_dir.join(file.csv_name());

        info!(year, file = %file.name, "fetching");
        let download = download_file(client, &url, &gz_path).await?;

        let unzip = tokio::task::spawn_blocking({
            let gz_path = gz_path.clone();
            let csv_path = csv_path.clone();
            move || gunzip_file(&gz_path, &csv_path)
        })
        .await??;

        report.fetched.push(FetchedYear {
            year,
            gz_path,
            csv_path,
            download,
            unzip,
        });
    }

    info!(
        fetched = report.fetched.len(),
        missing = report.missing.len(),
        "fetch complete"
    );
    Ok(report)
}
