// src/process/dataset.rs

use arrow::{
    array::{new_null_array, Array, ArrayRef, Float64Array, Int64Array},
    datatypes::{Field, Schema as ArrowSchema, SchemaRef},
    error::ArrowError,
    record_batch::RecordBatch,
};
use glob::{glob, Pattern};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, instrument};

use super::batches::BatchSource;
use super::columns::{
    calendar_fields, damage_fields, BEGIN_YEARMONTH, KEPT_COLUMNS, TOTAL_DAMAGE_USD,
};
use super::normalize::normalize_batch;
use super::region::filter_region;
use crate::error::{Result, StormError};
use crate::naming::{select_latest, DetailsFile};

/// The decompressed details file chosen for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: i32,
    pub path: PathBuf,
}

/// Resolve the latest local CSV for every year in `start..=end`.
///
/// Selection goes through the same newest-revision policy the fetcher uses.
/// Any year without a file fails the whole lookup.
pub fn iter_year_files(raw_dir: &Path, start: i32, end: i32) -> Result<Vec<YearFile>> {
    let dir = Pattern::escape(&raw_dir.to_string_lossy());
    let mut out = Vec::new();

    for year in start..=end {
        let pattern = format!("{}/{}", dir, DetailsFile::csv_glob_for_year(year));
        let candidates = glob(&pattern)?
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                DetailsFile::parse(name).filter(|f| f.year == year)
            });

        let Some(file) = select_latest(candidates).remove(&year) else {
            return Err(StormError::MissingLocalFile {
                year,
                dir: raw_dir.to_path_buf(),
            });
        };
        out.push(YearFile {
            year,
            path: raw_dir.join(&file.name),
        });
    }
    Ok(out)
}

/// Region-filtered, normalized rows from one source file.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    batches: Vec<RecordBatch>,
}

impl RegionTable {
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn total_damage_usd(&self) -> f64 {
        self.batches
            .iter()
            .filter_map(|b| b.column_by_name(TOTAL_DAMAGE_USD))
            .filter_map(|c| c.as_any().downcast_ref::<Float64Array>())
            .flat_map(|a| a.values().iter().copied())
            .sum()
    }

    pub fn column_names(&self) -> HashSet<&str> {
        self.batches
            .iter()
            .flat_map(|b| {
                b.schema_ref()
                    .fields()
                    .iter()
                    .map(|f| f.name().as_str())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Scan one file in row batches, keeping only `region` rows.
///
/// Batches with no matching rows are dropped as they are read, so memory is
/// bounded by `batch_rows` plus the matches. No matches is an empty table.
#[instrument(level = "info", skip_all, fields(file = %path.display()))]
pub fn load_filter_region_one_file(
    path: &Path,
    region: &str,
    batch_rows: usize,
) -> Result<RegionTable> {
    let source = BatchSource::open(path, batch_rows)?;
    let present = source.columns();
    let absent: Vec<&str> = KEPT_COLUMNS
        .iter()
        .map(|c| c.name)
        .filter(|name| !present.contains(name))
        .collect();
    if !absent.is_empty() {
        debug!(?absent, "optional columns absent, will be null");
    }
    let mut table = RegionTable::default();

    for (idx, batch) in source.batches()?.enumerate() {
        let batch = batch?;
        let read = batch.num_rows();
        match filter_region(&batch, region)? {
            Some(matched) => {
                debug!(batch = idx, read, matched = matched.num_rows(), "batch matched");
                table.batches.push(normalize_batch(&matched)?);
            }
            None => debug!(batch = idx, read, "batch had no matches"),
        }
    }
    Ok(table)
}

/// Output schema for a set of tables: kept columns seen in any table, in
/// canonical order, then damage, then calendar fields.
pub fn output_schema<'a, I>(tables: I) -> SchemaRef
where
    I: IntoIterator<Item = &'a RegionTable>,
{
    let mut present = HashSet::new();
    for t in tables {
        present.extend(t.column_names());
    }

    let mut fields: Vec<Field> = KEPT_COLUMNS
        .iter()
        .filter(|c| present.contains(c.name))
        .map(|c| c.output_field())
        .collect();
    fields.extend(damage_fields());
    fields.extend(calendar_fields());
    Arc::new(ArrowSchema::new(fields))
}

/// `(year, month)` from a `YYYYMM` integer.
pub fn split_yearmonth(ym: i64) -> (i64, i64) {
    (ym.div_euclid(100), ym.rem_euclid(100))
}

/// Reshape a normalized batch onto `schema`: absent columns become nulls and
/// `BEGIN_YEAR` / `BEGIN_MONTH` are derived from `BEGIN_YEARMONTH`.
pub fn conform_batch(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let ym = batch
        .column_by_name(BEGIN_YEARMONTH)
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| {
            ArrowError::SchemaError(format!("{} missing or not Int64", BEGIN_YEARMONTH))
        })?;
    let (years, months): (Vec<Option<i64>>, Vec<Option<i64>>) = ym
        .iter()
        .map(|v| match v.map(split_yearmonth) {
            Some((y, m)) => (Some(y), Some(m)),
            None => (None, None),
        })
        .unzip();

    let calendar: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(years)),
        Arc::new(Int64Array::from(months)),
    ];
    let n_source = schema.fields().len() - calendar.len();

    let mut columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .take(n_source)
        .map(|f| {
            batch
                .column_by_name(f.name())
                .cloned()
                .unwrap_or_else(|| new_null_array(f.data_type(), rows))
        })
        .collect();
    columns.extend(calendar);

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}
