use super::cells::{code_column, factorize, label_cells};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::cmp::Ordering;

/// Nominal columns after repair and ordinal encoding.
#[derive(Clone, Debug)]
pub struct EncodedNominals {
    /// One `UInt32` code column per nominal column, in input order.
    pub frame: DataFrame,
    pub columns: Vec<String>,
    /// Per column, the category label behind each code.
    pub levels: Vec<Vec<String>>,
}

impl EncodedNominals {
    /// Pairs each column name with its levels.
    pub fn named_levels(&self) -> Vec<(String, Vec<String>)> {
        self.columns
            .iter()
            .cloned()
            .zip(self.levels.iter().cloned())
            .collect()
    }
}

/// Fills missing nominal cells with the column mode, then encodes every column independently
/// as dense codes in first-occurrence order.
///
/// # Errors
///
/// Returns an imputation error if a column has no observed value, since no mode exists.
pub fn repair_and_encode(nominal: &DataFrame, columns: &[String]) -> Result<EncodedNominals> {
    if columns.is_empty() {
        return Ok(EncodedNominals {
            frame: DataFrame::empty(),
            columns: Vec::new(),
            levels: Vec::new(),
        });
    }

    let mut labels = Vec::with_capacity(columns.len());
    let mut fills = Vec::with_capacity(columns.len());
    for name in columns {
        let series = Series::new(name.as_str().into(), label_cells(nominal.column(name)?)?);
        let Some(mode) = most_frequent(&series)? else {
            return Err(PrepError::Imputation(format!(
                "Nominal column '{name}' has no observed values, so it has no mode"
            )));
        };
        if series.null_count() > 0 {
            tracing::debug!(
                "Filling {} missing cell(s) of '{name}' with '{mode}'",
                series.null_count()
            );
        }
        fills.push(col(name.as_str()).fill_null(lit(mode)));
        labels.push(Column::from(series));
    }

    let repaired = DataFrame::new(labels)?.lazy().with_columns(fills).collect()?;

    let mut encoded = Vec::with_capacity(columns.len());
    let mut levels = Vec::with_capacity(columns.len());
    for name in columns {
        let values: Vec<&str> = repaired.column(name)?.str()?.into_no_null_iter().collect();
        let (codes, column_levels) = factorize(&values, |v| *v);

        tracing::debug!(
            "Encoded nominal column '{name}' into {} code(s)",
            column_levels.len()
        );
        encoded.push(code_column(name, codes));
        levels.push(column_levels.into_iter().map(str::to_owned).collect());
    }

    Ok(EncodedNominals {
        frame: DataFrame::new(encoded)?,
        columns: columns.to_vec(),
        levels,
    })
}

/// The most frequent non-missing label of a text series. Ties go to the smallest label.
///
/// # Errors
///
/// Returns an error if the series is not text or the counts cannot be computed.
pub fn most_frequent(labels: &Series) -> Result<Option<String>> {
    let mut observed = labels.drop_nulls();
    if observed.is_empty() {
        return Ok(None);
    }
    observed.rename("label".into());

    let counts = observed.value_counts(true, false, "count".into(), false)?;
    let values = counts.column("label")?.str()?;
    let tallies = counts.column("count")?.cast(&DataType::UInt64)?;
    let tallies = tallies.u64()?;
    let Some(top) = tallies.max() else {
        return Ok(None);
    };

    Ok(values
        .into_iter()
        .zip(tallies)
        .filter_map(|(label, count)| label.filter(|_| count == Some(top)))
        .min_by(|a, b| compare_labels(a, b))
        .map(str::to_owned))
}

// Numeric labels compare by value so "9" sorts before "10", and sort before text labels.
fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
