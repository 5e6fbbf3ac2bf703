// src/cli.rs

use clap::Args;
use std::path::PathBuf;

use crate::{config::Config, error::Result};

/// Flags shared by every binary. Anything left unset falls back to the
/// config file (if given) and then to the compiled-in defaults.
#[derive(Debug, Default, Clone, Args)]
pub struct Overrides {
    /// YAML file with any subset of the config keys.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First year to process (inclusive).
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year to process (inclusive).
    #[arg(long)]
    pub end_year: Option<i32>,

    /// STATE value to keep, matched case-insensitively.
    #[arg(long)]
    pub region: Option<String>,

    #[arg(long, value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Where the Parquet dataset is written.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory index of the published files; a trailing `/` is implied.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Rows per CSV read batch.
    #[arg(long)]
    pub batch_rows: Option<usize>,
}

impl Overrides {
    /// Layer file values and flags over the defaults, then validate.
    pub fn resolve(self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };

        if let Some(v) = self.start_year {
            cfg.start_year = v;
        }
        if let Some(v) = self.end_year {
            cfg.end_year = v;
        }
        if let Some(v) = self.region {
            cfg.region = v;
        }
        if let Some(v) = self.raw_dir {
            cfg.raw_dir = v;
        }
        if let Some(v) = self.output {
            cfg.output_path = v;
        }
        if let Some(v) = self.base_url {
            cfg.base_url = v;
        }
        if let Some(v) = self.batch_rows {
            cfg.batch_rows = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
