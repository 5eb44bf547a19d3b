use super::classify::{select_by_type, unclassified_columns};
use super::impute::MultivariateImputer;
use super::indicator::expand_indicators;
use super::io::{load_dataset, load_type_table};
use super::nominal::repair_and_encode;
use super::normalize::normalize;
use super::target::recode_target;
use super::types::{CleanDataArtifact, ColumnType, ColumnTypeTable, PrepWarning};
use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Runs the full cleaning sequence over an in-memory dataset.
///
/// Stages run strictly in order: target separation, nominal repair and encoding, numeric
/// normalization, indicator expansion of the nominal columns and of the target, numeric
/// imputation, and reassembly as numeric columns, then nominal columns, then the target.
///
/// Any failure aborts the run; no partially cleaned artifact is produced.
///
/// # Errors
///
/// Configuration errors for absent target or declared columns, imputation errors for
/// columns with nothing to impute from, data processing errors from polars or the solver.
pub fn run_pipeline(
    dataset: &DataFrame,
    types: &ColumnTypeTable,
    config: &PrepConfig,
) -> Result<CleanDataArtifact> {
    config.validate()?;
    let start = Instant::now();
    let target_col = config.target_column.as_str();
    let mut warnings: Vec<PrepWarning> = Vec::new();

    tracing::info!(
        "Cleaning {} rows x {} columns (target '{target_col}')",
        dataset.height(),
        dataset.width()
    );

    // 1. Separate and recode the target
    let recoded = recode_target(dataset, types, target_col, config.target_policy)?;
    let rows = recoded.features.height();
    tracing::debug!(
        "Target recoded into {} class(es); {} row(s) kept, {} dropped",
        recoded.levels.len(),
        rows,
        recoded.dropped_rows
    );

    let dropped = unclassified_columns(&recoded.features, &recoded.types);
    if !dropped.is_empty() {
        warnings.push(PrepWarning::UnclassifiedColumns { columns: dropped }.raise());
    }

    // 2. Nominal columns: mode repair, ordinal encoding
    let (nominal, nominal_cols) =
        select_by_type(&recoded.features, &recoded.types, &ColumnType::Nominal)?;
    let encoded = repair_and_encode(&nominal, &nominal_cols)?;

    // 3. Numeric columns: min-max normalization
    let (numeric, numeric_cols) =
        select_by_type(&recoded.features, &recoded.types, &ColumnType::Numeric)?;
    let (normalized, range_warnings) = normalize(&numeric, config.degenerate_range)?;
    warnings.extend(range_warnings);

    // 4. Indicator views used only as regressors
    let (nominal_indicators, nominal_warnings) =
        expand_indicators(&encoded.frame, &encoded.columns, rows)?;
    warnings.extend(nominal_warnings);
    let target_names = [target_col.to_owned()];
    let (target_indicators, target_warnings) =
        expand_indicators(&recoded.target, &target_names, rows)?;
    warnings.extend(target_warnings);

    // 5. Multivariate numeric imputation
    let imputer = MultivariateImputer::new(config.imputer.clone());
    tracing::debug!(
        "Imputing with seed {} and at most {} round(s)",
        imputer.config().seed,
        imputer.config().max_iter
    );
    let imputed = imputer.impute(&normalized, &nominal_indicators, &target_indicators)?;
    tracing::debug!("Imputed {} numeric column(s)", numeric_cols.len());

    // 6. Reassemble: numeric, nominal, target
    let columns: Vec<Column> = imputed
        .get_columns()
        .iter()
        .chain(encoded.frame.get_columns())
        .chain(recoded.target.get_columns())
        .cloned()
        .collect();
    let data = DataFrame::new(columns)?;

    if data.height() != rows {
        return Err(PrepError::DataProcessing(format!(
            "Reassembled table has {} rows, expected {rows}",
            data.height()
        )));
    }

    tracing::info!(
        "Cleaned data ready: {} rows x {} columns, {} warning(s), took {:?}",
        data.height(),
        data.width(),
        warnings.len(),
        start.elapsed()
    );

    Ok(CleanDataArtifact::new(
        data,
        recoded.types,
        target_col.to_owned(),
        encoded.named_levels(),
        recoded.levels,
        warnings,
    ))
}

/// Loads the dataset and its column type table from CSV files, then runs the pipeline.
///
/// # Errors
///
/// Any loading error, then everything [`run_pipeline`] can return.
pub fn clean_files(
    data_path: &Path,
    types_path: &Path,
    config: &PrepConfig,
) -> Result<CleanDataArtifact> {
    let dataset = load_dataset(data_path)?;
    let types = load_type_table(types_path)?;
    run_pipeline(&dataset, &types, config)
}
