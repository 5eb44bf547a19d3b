use super::cells::code_cells;
use super::types::PrepWarning;
use crate::error::Result;
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;

/// Binary indicator view of encoded categorical columns.
///
/// One column per distinct code observed in each source column, in ascending code order,
/// named `<column>_<code>`. Only ever built as regressors for numeric imputation.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorMatrix {
    pub names: Vec<String>,
    /// `rows x names.len()`, every cell 0.0 or 1.0.
    pub values: Array2<f64>,
}

impl IndicatorMatrix {
    pub fn empty(rows: usize) -> Self {
        Self {
            names: Vec::new(),
            values: Array2::zeros((rows, 0)),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }
}

/// Expands each named code column of `encoded` into indicator columns.
///
/// `rows` sizes the result when `columns` is empty. A source column with a single distinct
/// code yields a constant indicator; that is reported as a [`PrepWarning::SingleCategory`].
///
/// # Errors
///
/// Returns an error if a named column is missing or holds missing codes.
pub fn expand_indicators(
    encoded: &DataFrame,
    columns: &[String],
    rows: usize,
) -> Result<(IndicatorMatrix, Vec<PrepWarning>)> {
    let mut names = Vec::new();
    let mut blocks: Vec<Vec<f64>> = Vec::new();
    let mut warnings = Vec::new();

    for name in columns {
        let source = encoded.column(name)?;
        let mut observed = code_cells(source)?;
        observed.sort_unstable();
        observed.dedup();

        if observed.len() == 1 {
            warnings.push(
                PrepWarning::SingleCategory {
                    column: name.clone(),
                }
                .raise(),
            );
        }

        // polars names dummies `<column>_<value>`, sorted as text; reorder by code.
        let dummies = source.as_materialized_series().to_dummies(None, false)?;
        for code in observed {
            let indicator = format!("{name}_{code}");
            let values = dummies.column(&indicator)?.cast(&DataType::Float64)?;
            blocks.push(values.f64()?.into_no_null_iter().collect());
            names.push(indicator);
        }
    }

    if blocks.is_empty() {
        return Ok((IndicatorMatrix::empty(rows), warnings));
    }

    let n_rows = blocks.first().map_or(rows, Vec::len);
    let mut values = Array2::zeros((n_rows, blocks.len()));
    for (mut target, block) in values.columns_mut().into_iter().zip(&blocks) {
        target.assign(&ArrayView1::from(block.as_slice()));
    }

    tracing::debug!(
        "Expanded {} column(s) into {} indicator(s)",
        columns.len(),
        names.len()
    );
    Ok((IndicatorMatrix { names, values }, warnings))
}
