// src/process/region.rs

use arrow::{
    array::{BooleanArray, StringArray},
    compute::filter_record_batch,
    record_batch::RecordBatch,
};

use super::columns::STATE;
use super::normalize::as_strings;
use crate::error::Result;

/// True where `STATE` equals `region` ignoring case; null states never match.
pub fn region_mask(states: &StringArray, region: &str) -> BooleanArray {
    let target = region.to_uppercase();
    states
        .iter()
        .map(|s| Some(s.is_some_and(|s| s.to_uppercase() == target)))
        .collect()
}

/// Rows of `batch` in `region`, or `None` when no row matches.
pub fn filter_region(batch: &RecordBatch, region: &str) -> Result<Option<RecordBatch>> {
    let idx = batch.schema().index_of(STATE)?;
    let mask = region_mask(as_strings(batch.column(idx), STATE)?, region);
    if mask.true_count() == 0 {
        return Ok(None);
    }
    Ok(Some(filter_record_batch(batch, &mask)?))
}
