// src/process/normalize.rs

use arrow::{
    array::{Array, ArrayRef, Float64Array, Int64Array, StringArray},
    datatypes::{Schema as ArrowSchema, SchemaRef},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::columns::{damage_fields, kept_column, ColumnKind, DAMAGE_CROPS, DAMAGE_PROPERTY};
use super::damage::{coerce_measure, parse_damage_to_dollars, parse_integer, DamageValue};
use crate::error::Result;

pub(crate) fn as_strings<'a>(arr: &'a ArrayRef, name: &str) -> Result<&'a StringArray> {
    arr.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
        ArrowError::SchemaError(format!(
            "column {} expected Utf8, got {:?}",
            name,
            arr.data_type()
        ))
        .into()
    })
}

fn column_strings<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let idx = batch.schema().index_of(name)?;
    as_strings(batch.column(idx), name)
}

fn dollars(arr: &StringArray) -> Vec<f64> {
    arr.iter()
        .map(|v| parse_damage_to_dollars(DamageValue::from(v)))
        .collect()
}

/// Type the kept columns of a raw (all-Utf8) batch and append
/// `DAMAGE_PROPERTY_USD`, `DAMAGE_CROPS_USD` and `TOTAL_DAMAGE_USD`.
///
/// Raw damage strings are kept as text next to the parsed amounts.
pub fn normalize_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(batch.num_columns() + 3);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns() + 3);

    for (field, arr) in schema.fields().iter().zip(batch.columns()) {
        let Some(src) = kept_column(field.name()) else {
            continue;
        };
        let out: ArrayRef = match src.kind {
            ColumnKind::Text => Arc::clone(arr),
            ColumnKind::Integer => {
                let s = as_strings(arr, src.name)?;
                Arc::new(s.iter().map(parse_integer).collect::<Int64Array>())
            }
            ColumnKind::Measure => {
                let s = as_strings(arr, src.name)?;
                Arc::new(Float64Array::from_iter_values(s.iter().map(coerce_measure)))
            }
        };
        fields.push(src.output_field());
        columns.push(out);
    }

    let property = dollars(column_strings(batch, DAMAGE_PROPERTY)?);
    let crops = dollars(column_strings(batch, DAMAGE_CROPS)?);
    let total: Vec<f64> = property.iter().zip(&crops).map(|(p, c)| p + c).collect();

    fields.extend(damage_fields());
    columns.push(Arc::new(Float64Array::from(property)));
    columns.push(Arc::new(Float64Array::from(crops)));
    columns.push(Arc::new(Float64Array::from(total)));

    let schema: SchemaRef = Arc::new(ArrowSchema::new(fields));
    Ok(RecordBatch::try_new(schema, columns)?)
}
