// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StormError>;

#[derive(Error, Debug)]
pub enum StormError {
    /// The listing page parsed but contained no details files; the upstream
    /// naming convention has most likely changed.
    #[error("no StormEvents_details files found in directory listing; page format may have changed")]
    FormatDrift,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no CSV found for year {year} in {}", .dir.display())]
    MissingLocalFile { year: i32, dir: PathBuf },

    #[error("required column {column} missing from {}", .path.display())]
    MissingColumn { column: &'static str, path: PathBuf },

    #[error("no {region} records found across years {start}-{end}")]
    EmptyResult { region: String, start: i32, end: i32 },

    #[error("invalid year range: start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
