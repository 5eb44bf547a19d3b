use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOMINAL_TAG: &str = "nominal";
pub const NUMERIC_TAG: &str = "numeric";

// DATA STRUCTURES

/// Declared type of a feature column.
///
/// Tags are matched by exact, case-sensitive equality. Anything other than
/// `"nominal"` or `"numeric"` is kept verbatim as [`ColumnType::Unrecognized`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Nominal,
    Numeric,
    Unrecognized(String),
}

impl ColumnType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            NOMINAL_TAG => Self::Nominal,
            NUMERIC_TAG => Self::Numeric,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Nominal => NOMINAL_TAG,
            Self::Numeric => NUMERIC_TAG,
            Self::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ColumnType> for String {
    fn from(kind: ColumnType) -> Self {
        kind.as_str().to_owned()
    }
}

/// Ordered mapping from column name to declared type.
///
/// The order of entries is the order of the columns in the type table file, and it is the
/// order in which [`select_by_type`](super::classify::select_by_type) emits sub-tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeTable {
    entries: Vec<(String, ColumnType)>,
}

impl ColumnTypeTable {
    /// Builds a table from `(column, tag)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a column name appears twice.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let mut table = Self::default();
        for (name, tag) in pairs {
            let name = name.into();
            if table.contains(&name) {
                return Err(PrepError::Configuration(format!(
                    "Column '{name}' has more than one entry in the type table"
                )));
            }
            table.entries.push((name, ColumnType::parse(tag.as_ref())));
        }
        Ok(table)
    }

    /// Reads a one-row frame whose headers are column names and whose cells are type tags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the frame has exactly one row.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        if df.height() != 1 {
            return Err(PrepError::Configuration(format!(
                "Column type table must have exactly one data row, found {}",
                df.height()
            )));
        }

        let mut pairs = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let tags = column.as_materialized_series().cast(&DataType::String)?;
            let tag = tags.str()?.get(0).unwrap_or("").trim().to_owned();
            pairs.push((column.name().to_string(), tag));
        }
        Self::from_pairs(pairs)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnType> {
        self.entries
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, kind)| kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes the entry for `name`, returning its type if it existed.
    pub fn remove(&mut self, name: &str) -> Option<ColumnType> {
        let idx = self.entries.iter().position(|(col, _)| col == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Column names declared with `kind`, in table order.
    pub fn names_of(&self, kind: &ColumnType) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, k)| k == kind)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnType)> {
        self.entries.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Non-fatal conditions raised during a run.
///
/// None of these abort the pipeline. They are logged when raised and handed back on the
/// artifact so callers can decide whether to exclude the affected columns next time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrepWarning {
    /// A numeric column whose observed minimum equals its maximum.
    DegenerateRange { column: String },
    /// A categorical column that expanded into a single indicator.
    SingleCategory { column: String },
    /// Columns left out of every group because they have no recognised type.
    UnclassifiedColumns { columns: Vec<String> },
}

impl fmt::Display for PrepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateRange { column } => {
                write!(f, "numeric column '{column}' has zero range")
            }
            Self::SingleCategory { column } => {
                write!(f, "column '{column}' expands to a single indicator")
            }
            Self::UnclassifiedColumns { columns } => write!(
                f,
                "{} column(s) without a recognised type were dropped: {}",
                columns.len(),
                columns.join(", ")
            ),
        }
    }
}

impl PrepWarning {
    /// Logs the warning and returns it, so call sites can push and report in one step.
    pub(crate) fn raise(self) -> Self {
        tracing::warn!("{self}");
        self
    }
}

/// The final product of one pipeline run.
///
/// The table holds the normalized and imputed numeric columns, then the encoded nominal
/// columns, then the recoded target, in that order. Consumers should locate the target by
/// [`target_column`](Self::target_column) rather than by position.
#[derive(Clone, Debug)]
pub struct CleanDataArtifact {
    data: DataFrame,
    column_types: ColumnTypeTable,
    target_column: String,
    nominal_levels: Vec<(String, Vec<String>)>,
    target_levels: Vec<f64>,
    warnings: Vec<PrepWarning>,
}

impl CleanDataArtifact {
    pub(crate) fn new(
        data: DataFrame,
        column_types: ColumnTypeTable,
        target_column: String,
        nominal_levels: Vec<(String, Vec<String>)>,
        target_levels: Vec<f64>,
        warnings: Vec<PrepWarning>,
    ) -> Self {
        Self {
            data,
            column_types,
            target_column,
            nominal_levels,
            target_levels,
            warnings,
        }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// The type table with the target entry removed.
    pub fn column_types(&self) -> &ColumnTypeTable {
        &self.column_types
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// For each encoded nominal column, the category label behind each code.
    pub fn nominal_levels(&self) -> &[(String, Vec<String>)] {
        &self.nominal_levels
    }

    /// The merged original target value behind each target code.
    pub fn target_levels(&self) -> &[f64] {
        &self.target_levels
    }

    pub fn warnings(&self) -> &[PrepWarning] {
        &self.warnings
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            row_count: self.data.height(),
            column_count: self.data.width(),
            numeric_columns: self.column_types.names_of(&ColumnType::Numeric),
            nominal_columns: self.column_types.names_of(&ColumnType::Nominal),
            target_column: self.target_column.clone(),
            target_classes: self.target_levels.len(),
            warnings: self.warnings.clone(),
        }
    }
}

/// Serializable overview of an artifact, for reporting.
#[derive(Clone, Debug, Serialize)]
pub struct ArtifactSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<String>,
    pub nominal_columns: Vec<String>,
    pub target_column: String,
    pub target_classes: usize,
    pub warnings: Vec<PrepWarning>,
}
