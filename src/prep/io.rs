use super::cells::MISSING_TOKENS;
use super::types::ColumnTypeTable;
use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Loads the raw dataset from a CSV file with a header row.
///
/// Every cell is read as text: how a column is interpreted is decided by its entry in the
/// type table, never by a dtype guessed from a sample of rows. The tokens in
/// [`MISSING_TOKENS`] are read as missing and ragged lines are truncated.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed as CSV at all.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(MISSING_TOKENS.iter().map(|t| (*t).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| {
            opts.with_truncate_ragged_lines(true)
                .with_null_values(Some(null_values.clone()))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open dataset {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    tracing::info!(
        "Loaded dataset {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Loads the column type table: a CSV whose headers are column names and whose single data
/// row holds the type tags.
///
/// # Errors
///
/// Returns an error if the file cannot be read, and a configuration error if it does not
/// have exactly one data row or repeats a column.
pub fn load_type_table(path: &Path) -> Result<ColumnTypeTable> {
    // Zero inference rows reads every cell as text.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open type table {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read type table {}", path.display()))?;

    let table = ColumnTypeTable::from_frame(&df)
        .with_context(|| format!("Invalid type table {}", path.display()))?;
    tracing::debug!("Loaded {} column type(s) from {}", table.len(), path.display());
    Ok(table)
}
