// src/process/mod.rs

pub mod batches;
pub mod columns;
pub mod damage;
pub mod dataset;
pub mod normalize;
pub mod region;
pub mod write;

use std::{fmt, path::PathBuf, time::Instant};
use tracing::{info, instrument};

pub use damage::{parse_damage_to_dollars, DamageValue};
pub use dataset::{iter_year_files, load_filter_region_one_file, RegionTable, YearFile};

use crate::{
    config::Config,
    error::{Result, StormError},
};
use dataset::{conform_batch, output_schema};
use write::write_parquet;

/// Per-year outcome of the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub file: PathBuf,
    pub rows: usize,
    pub total_damage_usd: f64,
}

#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub output_path: PathBuf,
    pub region: String,
    pub rows: usize,
    pub years: Vec<YearSummary>,
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} dataset: {}", self.region, self.output_path.display())?;
        writeln!(f, "{:>6} {:>10} {:>20}", "year", "rows", "total_damage_usd")?;
        for y in &self.years {
            writeln!(f, "{:>6} {:>10} {:>20.2}", y.year, y.rows, y.total_damage_usd)?;
        }
        let damage: f64 = self.years.iter().map(|y| y.total_damage_usd).sum();
        write!(f, "{:>6} {:>10} {:>20.2}", "all", self.rows, damage)
    }
}

/// Build the regional dataset from the raw files and write it to
/// `config.output_path`, replacing any previous output.
///
/// Every configured year must have a local file. Years with no regional rows
/// are reported but contribute nothing; if no year has any, nothing is written.
#[instrument(level = "info", skip_all, fields(region = %config.region, start = config.start_year, end = config.end_year))]
pub fn run(config: &Config) -> Result<DatasetReport> {
    let start = Instant::now();
    let files = iter_year_files(&config.raw_dir, config.start_year, config.end_year)?;

    let mut years = Vec::with_capacity(files.len());
    let mut tables = Vec::new();
    for YearFile { year, path } in files {
        info!(year, file = %path.display(), "reading");
        let table = load_filter_region_one_file(&path, &config.region, config.batch_rows)?;
        let rows = table.num_rows();
        info!(year, rows, "{} rows", config.region);

        years.push(YearSummary {
            year,
            file: path,
            rows,
            total_damage_usd: table.total_damage_usd(),
        });
        if !table.is_empty() {
            tables.push(table);
        }
    }

    if tables.is_empty() {
        return Err(StormError::EmptyResult {
            region: config.region.clone(),
            start: config.start_year,
            end: config.end_year,
        });
    }

    let schema = output_schema(&tables);
    let batches = tables
        .iter()
        .flat_map(|t| t.batches())
        .map(|b| conform_batch(b, &schema));
    let rows = write_parquet(&config.output_path, schema.clone(), batches)?;

    info!(
        path = %config.output_path.display(),
        rows,
        elapsed = ?start.elapsed(),
        "saved dataset"
    );
    Ok(DatasetReport {
        output_path: config.output_path.clone(),
        region: config.region.clone(),
        rows,
        years,
    })
}
