// src/process/batches.rs

use arrow::csv::{Reader, ReaderBuilder};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

use super::columns::{kept_column, KEPT_COLUMNS};
use crate::error::{Result, StormError};

/// Read just the header row.
fn read_headers(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    Ok(rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect())
}

/// Every column read as nullable Utf8; typing happens after filtering so a
/// malformed cell never fails the read.
fn make_read_schema(headers: &[String]) -> SchemaRef {
    Arc::new(ArrowSchema::new(
        headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// A source CSV, read as a finite sequence of row batches restricted to the
/// kept columns. Each call to [`BatchSource::batches`] starts over from the
/// top of the file.
#[derive(Debug, Clone)]
pub struct BatchSource {
    path: PathBuf,
    batch_rows: usize,
    read_schema: SchemaRef,
    projection: Vec<usize>,
}

impl BatchSource {
    pub fn open(path: impl Into<PathBuf>, batch_rows: usize) -> Result<Self> {
        let path = path.into();
        let headers = read_headers(&path)?;

        if let Some(missing) = KEPT_COLUMNS
            .iter()
            .filter(|c| c.required)
            .find(|c| !headers.iter().any(|h| h == c.name))
        {
            return Err(StormError::MissingColumn {
                column: missing.name,
                path,
            });
        }

        let projection: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| kept_column(h).is_some())
            .map(|(i, _)| i)
            .collect();
        debug!(
            file = %path.display(),
            columns = headers.len(),
            kept = projection.len(),
            "opened source"
        );

        Ok(Self {
            path,
            batch_rows: batch_rows.max(1),
            read_schema: make_read_schema(&headers),
            projection,
        })
    }

    /// Names of the kept columns present in this file, in file order.
    pub fn columns(&self) -> Vec<&str> {
        self.projection
            .iter()
            .map(|&i| self.read_schema.field(i).name().as_str())
            .collect()
    }

    /// Fresh pass over the file.
    pub fn batches(&self) -> Result<RowBatches> {
        let file = File::open(&self.path)?;
        let reader = ReaderBuilder::new(self.read_schema.clone())
            .with_header(true)
            .with_batch_size(self.batch_rows)
            .with_projection(self.projection.clone())
            .build(file)?;
        Ok(RowBatches { reader })
    }
}

/// Lazy iterator of projected row batches; ends at EOF.
pub struct RowBatches {
    reader: Reader<File>,
}

impl Iterator for RowBatches {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next().map(|r| r.map_err(StormError::from))
    }
}
