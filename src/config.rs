// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::Duration,
};

use url::Url;

use crate::error::{Result, StormError};

pub const DEFAULT_BASE_URL: &str = "https://www.ncei.noaa.gov/pub/data/swdi/stormevents/csvfiles/";
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT_PATH: &str = "data/interim/tx_2010_2025.parquet";
pub const DEFAULT_REGION: &str = "TEXAS";
pub const DEFAULT_START_YEAR: i32 = 2010;
pub const DEFAULT_END_YEAR: i32 = 2025;
pub const DEFAULT_BATCH_ROWS: usize = 200_000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Settings shared by the fetch and transform stages.
///
/// Every field has a compiled-in default; a YAML file may override any subset
/// of them, and command-line flags override the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory index listing the published details files.
    pub base_url: String,
    /// Where compressed and decompressed yearly files live.
    pub raw_dir: PathBuf,
    /// The single Parquet artifact written by the transform stage.
    pub output_path: PathBuf,
    /// Value of the `STATE` column to keep, compared case-insensitively.
    pub region: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Rows per CSV read batch; bounds peak memory during the transform.
    pub batch_rows: usize,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            region: DEFAULT_REGION.to_string(),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            batch_rows: DEFAULT_BATCH_ROWS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load a YAML file; keys that are absent keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(StormError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if self.batch_rows == 0 {
            return Err(StormError::Config("batch_rows must be at least 1".into()));
        }
        if self.region.trim().is_empty() {
            return Err(StormError::Config("region must not be empty".into()));
        }
        self.listing_url()?;
        Ok(())
    }

    /// `base_url` as a directory URL. A missing trailing slash is added so
    /// file names join beneath it instead of replacing its last segment.
    pub fn listing_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
