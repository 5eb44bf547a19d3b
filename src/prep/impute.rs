//! Round-robin multivariate imputation of numeric columns.
//!
//! Each numeric column with gaps is regressed on the other columns of a joint feature
//! matrix (normalized numerics, nominal indicators, target indicators), and its missing
//! cells are replaced by the predictions. Columns are visited in a fixed order, and each
//! prediction sees the freshest values of every other column, including values imputed
//! earlier in the same round.

use super::cells::{float_cells, float_column};
use super::indicator::IndicatorMatrix;
use crate::error::{PrepError, Result};
use linfa::Dataset;
use linfa::traits::Fit as _;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate};
use polars::prelude::*;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Correlation floor used when weighting predictor candidates.
const CORRELATION_FLOOR: f64 = 1e-6;

/// Tunables of [`MultivariateImputer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputerConfig {
    /// Seeds predictor sampling.
    pub seed: u64,
    /// Maximum number of full round-robin passes.
    pub max_iter: usize,
    /// Cap on predictors per regression; `None` uses every other column.
    pub n_nearest_features: Option<usize>,
    /// Early stop once a pass's change, the largest row sum of absolute cell changes, falls
    /// below `tolerance * max|observed|`.
    pub tolerance: f64,
    /// L2 penalty of each regression. Keeps collinear indicator blocks solvable.
    pub ridge_penalty: f64,
}

impl Default for ImputerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_iter: 1,
            n_nearest_features: Some(350),
            tolerance: 1e-3,
            ridge_penalty: 1e-3,
        }
    }
}

impl ImputerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    pub fn with_n_nearest_features(mut self, n: Option<usize>) -> Self {
        self.n_nearest_features = n;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_ridge_penalty(mut self, penalty: f64) -> Self {
        self.ridge_penalty = penalty;
        self
    }

    /// # Errors
    ///
    /// Returns a configuration error for a zero iteration or predictor budget, or a negative
    /// tolerance or penalty.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(PrepError::Configuration(
                "imputer.max_iter must be at least 1".to_owned(),
            ));
        }
        if self.n_nearest_features == Some(0) {
            return Err(PrepError::Configuration(
                "imputer.n_nearest_features must be at least 1 when set".to_owned(),
            ));
        }
        if !(self.tolerance >= 0.0) {
            return Err(PrepError::Configuration(
                "imputer.tolerance must be non-negative".to_owned(),
            ));
        }
        if !(self.ridge_penalty >= 0.0) {
            return Err(PrepError::Configuration(
                "imputer.ridge_penalty must be non-negative".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Chained-equations imputer over a joint numeric/indicator feature matrix.
///
/// Given the same input and configuration the output is bit-for-bit identical: the column
/// visitation order is fixed and predictor sampling draws from a seeded ChaCha stream.
#[derive(Clone, Debug, Default)]
pub struct MultivariateImputer {
    config: ImputerConfig,
}

impl MultivariateImputer {
    pub fn new(config: ImputerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImputerConfig {
        &self.config
    }

    /// Fills the missing cells of `numeric` using the indicator views as extra regressors.
    ///
    /// Only the numeric columns come back, in their input order.
    ///
    /// # Errors
    ///
    /// Returns an imputation error if the joint matrix has fewer than two columns or a
    /// numeric column has no observed value, and a data processing error if the blocks do
    /// not share a row count or a regression cannot be solved.
    pub fn impute(
        &self,
        numeric: &DataFrame,
        nominal: &IndicatorMatrix,
        target: &IndicatorMatrix,
    ) -> Result<DataFrame> {
        let rows = target.n_rows();
        if nominal.n_rows() != rows || (numeric.width() > 0 && numeric.height() != rows) {
            return Err(PrepError::DataProcessing(format!(
                "Imputation blocks disagree on row count: numeric {}, nominal {}, target {}",
                numeric.height(),
                nominal.n_rows(),
                rows
            )));
        }

        let mut names: Vec<String> = numeric
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        let n_numeric = names.len();

        let mut numeric_block = Array2::from_elem((rows, n_numeric), f64::NAN);
        for (j, column) in numeric.get_columns().iter().enumerate() {
            for (i, cell) in float_cells(column)?.into_iter().enumerate() {
                if let Some(v) = cell {
                    numeric_block[[i, j]] = v;
                }
            }
        }

        let joint = concatenate(
            Axis(1),
            &[numeric_block.view(), nominal.values.view(), target.values.view()],
        )
        .map_err(|e| PrepError::DataProcessing(format!("Failed to join feature blocks: {e}")))?;
        names.extend(nominal.names.iter().cloned());
        names.extend(target.names.iter().cloned());

        let imputed = self.impute_matrix(&joint, &names)?;

        let columns: Vec<Column> = (0..n_numeric)
            .map(|j| {
                let values = imputed.column(j).iter().map(|&v| Some(v)).collect();
                float_column(&names[j], values)
            })
            .collect();
        if columns.is_empty() {
            return Ok(DataFrame::empty());
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Imputes every NaN cell of `joint`. `names` labels the columns for error messages.
    ///
    /// # Errors
    ///
    /// See [`impute`](Self::impute).
    pub fn impute_matrix(&self, joint: &Array2<f64>, names: &[String]) -> Result<Array2<f64>> {
        self.config.validate()?;

        let (n_rows, n_cols) = joint.dim();
        if n_cols < 2 {
            return Err(PrepError::Imputation(format!(
                "Joint feature matrix has {n_cols} column(s); at least 2 are needed to regress"
            )));
        }

        let missing = joint.mapv(f64::is_nan);
        let label = |j: usize| names.get(j).cloned().unwrap_or_else(|| format!("#{j}"));

        // Observed statistics per column
        let mut means = Vec::with_capacity(n_cols);
        let mut missing_counts = Vec::with_capacity(n_cols);
        for j in 0..n_cols {
            let observed: Vec<f64> = joint
                .column(j)
                .iter()
                .copied()
                .filter(|v| !v.is_nan())
                .collect();
            if observed.is_empty() {
                return Err(PrepError::Imputation(format!(
                    "Column '{}' has no observed values to impute from",
                    label(j)
                )));
            }
            means.push(observed.iter().sum::<f64>() / observed.len() as f64);
            missing_counts.push(n_rows - observed.len());
        }

        let observed_cells = || joint.iter().copied().filter(|v| !v.is_nan());
        let lower = observed_cells().fold(f64::INFINITY, f64::min);
        let upper = observed_cells().fold(f64::NEG_INFINITY, f64::max);
        let scale = observed_cells().fold(0.0_f64, |acc, v| acc.max(v.abs()));

        // Initial fill with column means
        let mut current = joint.clone();
        for ((i, j), v) in current.indexed_iter_mut() {
            if missing[[i, j]] {
                *v = means[j];
            }
        }

        // Fewest gaps first; ties keep column order.
        let mut order: Vec<usize> = (0..n_cols).filter(|&j| missing_counts[j] > 0).collect();
        order.sort_by_key(|&j| missing_counts[j]);
        if order.is_empty() {
            return Ok(current);
        }

        let n_predictors = self
            .config
            .n_nearest_features
            .map_or(n_cols - 1, |n| n.min(n_cols - 1));
        let weights = (n_predictors < n_cols - 1).then(|| abs_correlations(&current));
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let visiting = order.len();
        tracing::debug!(
            "Imputing {visiting}/{n_cols} column(s), {n_rows} rows, {n_predictors} predictor(s)"
        );

        for round in 0..self.config.max_iter {
            let previous = current.clone();

            for &j in &order {
                let predictors = match &weights {
                    Some(w) => sample_predictors(w, j, n_predictors, &mut rng)?,
                    None => (0..n_cols).filter(|&k| k != j).collect(),
                };
                self.fill_column(&mut current, &missing, j, &predictors, lower, upper)
                    .map_err(|e| match e {
                        PrepError::DataProcessing(msg) => PrepError::DataProcessing(format!(
                            "Regression for column '{}' failed: {msg}",
                            label(j)
                        )),
                        other => other,
                    })?;
            }

            let change = round_change(&current, &previous);
            tracing::debug!("Imputation round {} changed by {change:e}", round + 1);
            if change < self.config.tolerance * scale {
                tracing::debug!("Imputation converged after {} round(s)", round + 1);
                break;
            }
        }

        Ok(current)
    }

    // Regress column `j` on `predictors` over its observed rows, then overwrite its
    // missing rows with clamped predictions.
    fn fill_column(
        &self,
        data: &mut Array2<f64>,
        missing: &Array2<bool>,
        j: usize,
        predictors: &[usize],
        lower: f64,
        upper: f64,
    ) -> Result<()> {
        let (observed_rows, missing_rows): (Vec<usize>, Vec<usize>) =
            (0..data.nrows()).partition(|&i| !missing[[i, j]]);

        let x_train = data.select(Axis(0), &observed_rows).select(Axis(1), predictors);
        let y_train = data.column(j).select(Axis(0), &observed_rows);
        let (coefficients, intercept) = fit_ridge(&x_train, &y_train, self.config.ridge_penalty)?;

        for i in missing_rows {
            let row = data.row(i).select(Axis(0), predictors);
            let prediction = intercept + row.dot(&coefficients);
            data[[i, j]] = prediction.clamp(lower, upper);
        }
        Ok(())
    }
}

/// Infinity norm of the change between two rounds: the largest row sum of absolute changes.
pub fn round_change(current: &Array2<f64>, previous: &Array2<f64>) -> f64 {
    (current - previous)
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0_f64, f64::max)
}

/// Least squares with an L2 penalty, solved by linfa on centred data augmented with
/// `sqrt(penalty) * I` rows. Returns the coefficients and the intercept.
///
/// # Errors
///
/// Returns a data processing error if the solver fails.
pub fn fit_ridge(x: &Array2<f64>, y: &Array1<f64>, penalty: f64) -> Result<(Array1<f64>, f64)> {
    let p = x.ncols();
    let (Some(x_mean), Some(y_mean)) = (x.mean_axis(Axis(0)), y.mean()) else {
        return Err(PrepError::DataProcessing(
            "Cannot fit a regression on zero rows".to_owned(),
        ));
    };

    let x_centered = x - &x_mean;
    let y_centered = y - y_mean;
    let ridge_rows = Array2::from_diag(&Array1::from_elem(p, penalty.sqrt()));
    let ridge_targets = Array1::<f64>::zeros(p);

    let records = concatenate(Axis(0), &[x_centered.view(), ridge_rows.view()])
        .map_err(|e| PrepError::DataProcessing(e.to_string()))?;
    let targets = concatenate(Axis(0), &[y_centered.view(), ridge_targets.view()])
        .map_err(|e| PrepError::DataProcessing(e.to_string()))?;

    let model = LinearRegression::new()
        .with_intercept(false)
        .fit(&Dataset::new(records, targets))
        .map_err(|e| PrepError::DataProcessing(format!("Linear regression failed: {e}")))?;

    let coefficients = model.params().to_owned();
    let intercept = y_mean - coefficients.dot(&x_mean);
    Ok((coefficients, intercept))
}

/// Absolute Pearson correlations between columns, floored at [`CORRELATION_FLOOR`], with
/// a zero diagonal. Undefined correlations (constant columns) take the floor.
pub fn abs_correlations(data: &Array2<f64>) -> Array2<f64> {
    let n_cols = data.ncols();
    let centered: Vec<Array1<f64>> = data
        .columns()
        .into_iter()
        .map(|c| {
            let mean = c.mean().unwrap_or(0.0);
            c.mapv(|v| v - mean)
        })
        .collect();
    let norms: Vec<f64> = centered.iter().map(|c| c.dot(c).sqrt()).collect();

    let mut corr = Array2::zeros((n_cols, n_cols));
    for a in 0..n_cols {
        for b in (a + 1)..n_cols {
            let r = centered[a].dot(&centered[b]) / (norms[a] * norms[b]);
            let r = if r.is_finite() {
                r.abs().max(CORRELATION_FLOOR)
            } else {
                CORRELATION_FLOOR
            };
            corr[[a, b]] = r;
            corr[[b, a]] = r;
        }
    }
    corr
}

// Draw `amount` predictors for column `j` without replacement, weighted by correlation.
// Returned in ascending column order.
fn sample_predictors(
    weights: &Array2<f64>,
    j: usize,
    amount: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<usize>> {
    let candidates: Vec<usize> = (0..weights.ncols()).filter(|&k| k != j).collect();
    let column: ArrayView1<'_, f64> = weights.column(j);

    let picked = rand::seq::index::sample_weighted(
        rng,
        candidates.len(),
        |idx| column[candidates[idx]],
        amount,
    )
    .map_err(|e| PrepError::DataProcessing(format!("Predictor sampling failed: {e}")))?;

    let mut chosen: Vec<usize> = picked.into_vec().into_iter().map(|idx| candidates[idx]).collect();
    chosen.sort_unstable();
    Ok(chosen)
}
