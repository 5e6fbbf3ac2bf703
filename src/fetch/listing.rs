// src/fetch/listing.rs

use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, StormError};
use crate::naming::{scan_listing, select_latest, DetailsFile};

/// GET the directory index page and return its body.
#[instrument(level = "info", skip(client), fields(url = %base))]
pub async fn fetch_directory_listing(client: &Client, base: &Url) -> Result<String> {
    let body = client
        .get(base.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "fetched listing");
    Ok(body)
}

/// Map each year to the filename of its newest revision.
///
/// An empty result means the page no longer looks like we expect, which is
/// treated as fatal rather than as "nothing to do".
pub fn build_latest_file_map(text: &str) -> Result<BTreeMap<i32, String>> {
    Ok(latest_details_files(text)?
        .into_iter()
        .map(|(year, file)| (year, file.name))
        .collect())
}

/// Like [`build_latest_file_map`], keeping the parsed file identity.
pub fn latest_details_files(text: &str) -> Result<BTreeMap<i32, DetailsFile>> {
    let latest = select_latest(scan_listing(text));
    if latest.is_empty() {
        return Err(StormError::FormatDrift);
    }
    Ok(latest)
}
