use super::cells::{float_cells, float_column};
use super::types::PrepWarning;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// What to do with a numeric column whose observed minimum equals its maximum.
///
/// Either way a [`PrepWarning::DegenerateRange`] is raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRangePolicy {
    /// Observed cells become 0.0.
    #[default]
    Zero,
    /// Divide by the zero range anyway. Observed cells become NaN and are then treated as
    /// missing, which usually makes imputation of that column fail.
    Propagate,
}

/// Min-max scales every column of `numeric` to [0, 1] using its own observed range.
///
/// Missing cells stay missing, as do non-finite ones. Columns come back as `Float64`, in the
/// same order and with the same names.
///
/// # Errors
///
/// Returns an error if a column cannot be read as numbers.
pub fn normalize(
    numeric: &DataFrame,
    policy: DegenerateRangePolicy,
) -> Result<(DataFrame, Vec<PrepWarning>)> {
    if numeric.width() == 0 {
        return Ok((DataFrame::empty(), Vec::new()));
    }

    let mut columns = Vec::with_capacity(numeric.width());
    let mut exprs = Vec::with_capacity(numeric.width());
    let mut warnings = Vec::new();

    for column in numeric.get_columns() {
        let name = column.name().as_str();
        let cells = float_column(name, float_cells(column)?);
        let (min, max) = {
            let series = cells.as_materialized_series();
            (series.min::<f64>()?, series.max::<f64>()?)
        };

        let degenerate = matches!((min, max), (Some(lo), Some(hi)) if lo == hi);
        if degenerate {
            warnings.push(
                PrepWarning::DegenerateRange {
                    column: name.to_owned(),
                }
                .raise(),
            );
        }

        exprs.push(min_max_expr(col(name), degenerate, policy));
        columns.push(cells);
    }

    let scaled = DataFrame::new(columns)?.lazy().select(exprs).collect()?;
    Ok((scaled, warnings))
}

/// `(x - min) / (max - min)` over the observed cells of `expr`.
///
/// A zero range maps observed cells to 0.0 under [`DegenerateRangePolicy::Zero`]. Otherwise
/// the division goes ahead and NaN results are turned back into missing cells.
pub fn min_max_expr(expr: Expr, degenerate: bool, policy: DegenerateRangePolicy) -> Expr {
    if degenerate && policy == DegenerateRangePolicy::Zero {
        return expr * lit(0.0);
    }
    let min = expr.clone().min();
    let max = expr.clone().max();
    ((expr - min.clone()) / (max - min)).fill_nan(lit(NULL).cast(DataType::Float64))
}
