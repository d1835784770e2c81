// src/models/mod.rs

//! Typed rows for the dataset tables.
//!
//! Every table row has a fixed column set and knows how to move itself in
//! and out of a CSV record. Numeric payload values (serving values, nutrient
//! amounts) stay as their source lexical strings so a load/save cycle
//! reproduces the persisted file exactly; only ids are typed integers.

mod checkpoint;
mod conversion;
mod item;
mod nutrient;

pub use checkpoint::Checkpoint;
pub use conversion::ConversionRow;
pub use item::ItemRow;
pub use nutrient::{NutrientJunctionRow, NutrientLine, NutrientSection};

use crate::error::{AppError, Result};

/// A row that persists as one line of a named CSV table.
pub trait Record: Sized {
    /// File name of the table under the data directory.
    const FILE: &'static str;

    /// Column names, in persisted order.
    const HEADER: &'static [&'static str];

    /// Render the row as CSV fields in `HEADER` order.
    fn to_record(&self) -> Vec<String>;

    /// Rebuild the row from CSV fields in `HEADER` order.
    fn from_record(record: &[String]) -> Result<Self>;
}

/// Fetch a field by position, erroring with the table name on short rows.
pub(crate) fn field<'a>(record: &'a [String], idx: usize, file: &str) -> Result<&'a str> {
    record
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| AppError::table(file, format!("row has no column {idx}")))
}

/// Parse a surrogate id field.
pub(crate) fn parse_id(record: &[String], idx: usize, file: &str) -> Result<u32> {
    let raw = field(record, idx, file)?;
    raw.parse()
        .map_err(|_| AppError::table(file, format!("bad id {raw:?} in column {idx}")))
}

/// Parse an optional surrogate id field (empty string means absent).
pub(crate) fn parse_opt_id(record: &[String], idx: usize, file: &str) -> Result<Option<u32>> {
    let raw = field(record, idx, file)?;
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AppError::table(file, format!("bad id {raw:?} in column {idx}")))
}
