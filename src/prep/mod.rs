pub mod cells;
pub mod classify;
pub mod impute;
pub mod indicator;
pub mod io;
pub mod nominal;
pub mod normalize;
pub mod pipeline;
pub mod target;
pub mod types;

pub use classify::{select_by_type, unclassified_columns};
pub use impute::{ImputerConfig, MultivariateImputer};
pub use indicator::{IndicatorMatrix, expand_indicators};
pub use io::{load_dataset, load_type_table};
pub use nominal::{EncodedNominals, repair_and_encode};
pub use normalize::{DegenerateRangePolicy, normalize};
pub use pipeline::{clean_files, run_pipeline};
pub use target::{TargetMergePolicy, TargetRecoding, recode_target};
pub use types::{ArtifactSummary, CleanDataArtifact, ColumnType, ColumnTypeTable, PrepWarning};

#[cfg(test)]
mod tests;
