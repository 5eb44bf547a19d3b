//! Conversions between polars columns and plain cell vectors.
//!
//! The components work on `Vec<Option<_>>` cells so that "missing" has a single meaning
//! regardless of how the loader typed a column: null, floating NaN, and the textual tokens in
//! [`MISSING_TOKENS`] are all treated as absent.

use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// Text that stands for a missing cell.
pub const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "null", "NULL", "nan", "NaN"];

pub fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS.contains(&value.trim())
}

/// Reads a column as real numbers.
///
/// Text columns are parsed cell by cell after trimming. Unparsable text and non-finite values
/// (NaN, `inf`) become missing.
pub fn float_cells(column: &Column) -> Result<Vec<Option<f64>>> {
    if column.dtype() == &DataType::String {
        return Ok(label_cells(column)?
            .into_iter()
            .map(|label| label.and_then(|s| s.parse::<f64>().ok()))
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }

    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Reads a column as category labels.
pub fn label_cells(column: &Column) -> Result<Vec<Option<String>>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !is_missing_token(s))
                .map(str::to_owned)
        })
        .collect())
}

/// Reads an encoded column back as codes. Every cell must be present.
pub fn code_cells(column: &Column) -> Result<Vec<u32>> {
    let series = column.as_materialized_series().cast(&DataType::UInt32)?;
    let codes = series.u32()?;
    if codes.null_count() > 0 {
        return Err(crate::error::PrepError::DataProcessing(format!(
            "Encoded column '{}' contains missing codes",
            column.name()
        )));
    }
    Ok(codes.into_no_null_iter().collect())
}

/// Assigns dense codes `0..k` in order of first occurrence.
///
/// Returns the codes and, for each code, the value it stands for.
pub fn factorize<T, K, F>(values: &[T], key: F) -> (Vec<u32>, Vec<T>)
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashMap<K, u32> = HashMap::new();
    let mut levels = Vec::new();
    let codes = values
        .iter()
        .map(|value| {
            *seen.entry(key(value)).or_insert_with(|| {
                levels.push(value.clone());
                (levels.len() - 1) as u32
            })
        })
        .collect();
    (codes, levels)
}

pub fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Column::from(Series::new(name.into(), values))
}

pub fn code_column(name: &str, codes: Vec<u32>) -> Column {
    Column::from(Series::new(name.into(), codes))
}
