// src/process/columns.rs

use arrow::datatypes::{DataType, Field};

pub const BEGIN_YEARMONTH: &str = "BEGIN_YEARMONTH";
pub const STATE: &str = "STATE";
pub const DAMAGE_PROPERTY: &str = "DAMAGE_PROPERTY";
pub const DAMAGE_CROPS: &str = "DAMAGE_CROPS";

pub const DAMAGE_PROPERTY_USD: &str = "DAMAGE_PROPERTY_USD";
pub const DAMAGE_CROPS_USD: &str = "DAMAGE_CROPS_USD";
pub const TOTAL_DAMAGE_USD: &str = "TOTAL_DAMAGE_USD";
pub const BEGIN_YEAR: &str = "BEGIN_YEAR";
pub const BEGIN_MONTH: &str = "BEGIN_MONTH";

/// How a kept source column is typed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, kept verbatim.
    Text,
    /// Integer code (dates, times, ids); unparsable becomes null.
    Integer,
    /// Counts and magnitude; unparsable becomes 0.0.
    Measure,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Missing required columns fail the file; others are simply absent.
    pub required: bool,
}

const fn col(name: &'static str, kind: ColumnKind, required: bool) -> SourceColumn {
    SourceColumn {
        name,
        kind,
        required,
    }
}

/// The source columns kept, in output order.
pub const KEPT_COLUMNS: [SourceColumn; 20] = [
    col(BEGIN_YEARMONTH, ColumnKind::Integer, true),
    col("BEGIN_DAY", ColumnKind::Integer, false),
    col("BEGIN_TIME", ColumnKind::Integer, false),
    col("END_YEARMONTH", ColumnKind::Integer, false),
    col("END_DAY", ColumnKind::Integer, false),
    col("END_TIME", ColumnKind::Integer, false),
    col("EPISODE_ID", ColumnKind::Integer, false),
    col("EVENT_ID", ColumnKind::Integer, false),
    col(STATE, ColumnKind::Text, true),
    col("CZ_NAME", ColumnKind::Text, false),
    col("CZ_TYPE", ColumnKind::Text, false),
    col("EVENT_TYPE", ColumnKind::Text, false),
    col("MAGNITUDE", ColumnKind::Measure, false),
    col("INJURIES_DIRECT", ColumnKind::Measure, false),
    col("INJURIES_INDIRECT", ColumnKind::Measure, false),
    col("DEATHS_DIRECT", ColumnKind::Measure, false),
    col("DEATHS_INDIRECT", ColumnKind::Measure, false),
    col(DAMAGE_PROPERTY, ColumnKind::Text, true),
    col(DAMAGE_CROPS, ColumnKind::Text, true),
    col("SOURCE", ColumnKind::Text, false),
];

pub fn kept_column(name: &str) -> Option<&'static SourceColumn> {
    KEPT_COLUMNS.iter().find(|c| c.name == name)
}

impl SourceColumn {
    pub fn data_type(&self) -> DataType {
        match self.kind {
            ColumnKind::Text => DataType::Utf8,
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Measure => DataType::Float64,
        }
    }

    pub fn output_field(&self) -> Field {
        Field::new(self.name, self.data_type(), true)
    }
}

/// Damage amounts derived per row, appended after the source columns.
pub fn damage_fields() -> [Field; 3] {
    [
        Field::new(DAMAGE_PROPERTY_USD, DataType::Float64, false),
        Field::new(DAMAGE_CROPS_USD, DataType::Float64, false),
        Field::new(TOTAL_DAMAGE_USD, DataType::Float64, false),
    ]
}

/// Calendar fields split from `BEGIN_YEARMONTH`, appended last.
pub fn calendar_fields() -> [Field; 2] {
    [
        Field::new(BEGIN_YEAR, DataType::Int64, true),
        Field::new(BEGIN_MONTH, DataType::Int64, true),
    ]
}
