use super::cells::{code_column, factorize, float_cells};
use super::types::ColumnTypeTable;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How target categories are combined before re-coding.
///
/// `MergeTopTwo` is a business rule tied to the label distribution of the cohort data this
/// pipeline was built for: the highest category is too sparse to cluster on its own, so it is
/// folded into the one below it. Callers whose targets are shaped differently should pick
/// `Keep` (or add a variant) rather than special-case the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMergePolicy {
    /// Rows holding the maximum value are reassigned to `maximum - 1`.
    #[default]
    MergeTopTwo,
    /// Values are recoded as observed.
    Keep,
}

impl TargetMergePolicy {
    pub fn apply(self, values: &mut [f64]) {
        match self {
            Self::MergeTopTwo => {
                let Some(max) = values.iter().copied().reduce(f64::max) else {
                    return;
                };
                for v in values.iter_mut().filter(|v| **v == max) {
                    *v = max - 1.0;
                }
            }
            Self::Keep => {}
        }
    }
}

/// The target after separation from the working dataset.
#[derive(Clone, Debug)]
pub struct TargetRecoding {
    /// Dataset rows with a known target, target column removed.
    pub features: DataFrame,
    /// Type table with the target entry removed.
    pub types: ColumnTypeTable,
    /// Single-column frame of dense target codes, same row order as `features`.
    pub target: DataFrame,
    /// The merged original value behind each code.
    pub levels: Vec<f64>,
    /// How many rows were dropped for having no target.
    pub dropped_rows: usize,
}

/// Separates and recodes the target column.
///
/// Rows with a missing target are dropped first; every later stage sees only the remaining
/// rows, densely renumbered. The target is then removed from the dataset and the type table,
/// merged according to `policy`, and recoded by first occurrence.
///
/// # Errors
///
/// Returns a configuration error if `target` is absent from the dataset or the type table,
/// or holds non-numeric values, and an imputation error if no row has a known target.
pub fn recode_target(
    df: &DataFrame,
    types: &ColumnTypeTable,
    target: &str,
    policy: TargetMergePolicy,
) -> Result<TargetRecoding> {
    let Ok(column) = df.column(target) else {
        return Err(PrepError::Configuration(format!(
            "Target column '{target}' not found in the dataset"
        )));
    };
    if !types.contains(target) {
        return Err(PrepError::Configuration(format!(
            "Target column '{target}' not found in the column type table"
        )));
    }

    let raw = target_cells(column)?;

    // 1. Drop rows whose target is unknown
    let mask: BooleanChunked = raw.iter().map(Option::is_some).collect();
    let kept = df.filter(&mask)?;
    let dropped_rows = df.height() - kept.height();
    if kept.height() == 0 {
        return Err(PrepError::Imputation(format!(
            "Every row has a missing value in target column '{target}'"
        )));
    }
    tracing::debug!("Dropped {dropped_rows} row(s) with unknown target '{target}'");

    // 2. Separate the target
    let features = kept.drop(target)?;
    let mut types = types.clone();
    types.remove(target);

    // 3. Merge categories
    let mut values: Vec<f64> = raw.into_iter().flatten().collect();
    policy.apply(&mut values);

    // 4. Ordinal encode by first occurrence
    let (codes, levels) = factorize(&values, |v| v.to_bits());
    let target_frame = DataFrame::new(vec![code_column(target, codes)])?;

    Ok(TargetRecoding {
        features,
        types,
        target: target_frame,
        levels,
        dropped_rows,
    })
}

// Like `float_cells`, but text that is neither a number nor a missing token is an error.
fn target_cells(column: &Column) -> Result<Vec<Option<f64>>> {
    let numbers = float_cells(column)?;
    if column.dtype().is_primitive_numeric() {
        return Ok(numbers);
    }

    let labels = super::cells::label_cells(column)?;
    if let Some(bad) = labels
        .iter()
        .zip(&numbers)
        .find_map(|(label, number)| label.as_ref().filter(|_| number.is_none()))
    {
        return Err(PrepError::Configuration(format!(
            "Target column '{}' must hold numeric category values, found '{bad}'",
            column.name()
        )));
    }
    Ok(numbers)
}
