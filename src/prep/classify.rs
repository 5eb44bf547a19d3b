use super::types::{ColumnType, ColumnTypeTable};
use crate::error::{PrepError, Result};
use polars::prelude::*;

/// Selects the columns declared with `kind`.
///
/// Returns the sub-table and its column names, both in type-table order. Columns the table
/// does not declare as `kind` are left out, including columns the table does not mention at
/// all; see [`unclassified_columns`] to find those.
///
/// # Errors
///
/// Returns a configuration error if the table declares a column the dataset does not have.
pub fn select_by_type(
    df: &DataFrame,
    types: &ColumnTypeTable,
    kind: &ColumnType,
) -> Result<(DataFrame, Vec<String>)> {
    let names = types.names_of(kind);

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let Ok(column) = df.column(name) else {
            return Err(PrepError::Configuration(format!(
                "Column '{name}' is declared {kind} in the type table but absent from the dataset"
            )));
        };
        columns.push(column.clone());
    }

    let sub = if columns.is_empty() {
        DataFrame::empty()
    } else {
        DataFrame::new(columns)?
    };
    tracing::debug!("Selected {} {kind} column(s)", names.len());
    Ok((sub, names))
}

/// Dataset columns that belong to no group: either missing from the type table or tagged
/// with something other than nominal/numeric. Returned in dataset order.
pub fn unclassified_columns(df: &DataFrame, types: &ColumnTypeTable) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .filter(|name| {
            !matches!(
                types.get(name.as_str()),
                Some(ColumnType::Nominal | ColumnType::Numeric)
            )
        })
        .map(|name| name.to_string())
        .collect()
}
