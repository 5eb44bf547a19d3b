//! Centralized error handling for clusterprep.
//!
//! Every fallible operation in the crate returns [`Result<T>`], whose error side is
//! [`PrepError`]. The two variants callers usually branch on are:
//!
//! - [`PrepError::Configuration`]: a referenced column is absent from an input, or a
//!   configuration value is out of range. Fixing the inputs is the only remedy.
//! - [`PrepError::Imputation`]: a column carries no information to impute from (an
//!   all-missing column, a degenerate joint feature matrix). The run aborts and no
//!   partial artifact is produced.
//!
//! Neither is retried anywhere: both are deterministic given the input.
//!
//! ```
//! use clusterprep::error::PrepError;
//!
//! fn describe(err: &PrepError) -> &'static str {
//!     if err.is_configuration() {
//!         "check the column type table and target name"
//!     } else if err.is_imputation() {
//!         "a column has nothing to impute from"
//!     } else {
//!         "unexpected failure"
//!     }
//! }
//! # let _ = describe(&PrepError::Imputation("x".to_owned()));
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any `Result` whose error converts into
//! [`PrepError`], mirroring `anyhow`'s ergonomics inside the library:
//!
//! ```no_run
//! use clusterprep::error::ResultExt as _;
//!
//! fn load_settings() -> clusterprep::error::Result<String> {
//!     std::fs::read_to_string("settings.json").context("Failed to read settings")
//! }
//! ```

use thiserror::Error;

/// Main error type for clusterprep operations.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A referenced column is missing, or a configuration value is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No information exists to impute a column from.
    #[error("Imputation error: {0}")]
    Imputation(String),

    /// Polars or regression solver failures.
    #[error("Data processing error: {0}")]
    DataProcessing(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl PrepError {
    /// True for errors caused by inputs that reference absent columns or bad settings.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// True for errors raised because a column had nothing to impute from.
    pub fn is_imputation(&self) -> bool {
        matches!(self, Self::Imputation(_))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for clusterprep operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

// Configuration and imputation failures keep their variant so callers can still match on them.
fn wrap(context: String, err: PrepError) -> PrepError {
    match err {
        PrepError::Configuration(msg) => PrepError::Configuration(format!("{context}: {msg}")),
        PrepError::Imputation(msg) => PrepError::Imputation(format!("{context}: {msg}")),
        other => PrepError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::Configuration("column 'AGE' not found".to_owned());
        assert_eq!(err.to_string(), "Configuration error: column 'AGE' not found");
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "data.csv",
        ));

        let result: Result<()> = result.context("Failed to read dataset");
        let err = result.unwrap_err();
        assert!(matches!(err, PrepError::Other(_)));
        assert!(err.to_string().contains("Failed to read dataset"));
    }

    #[test]
    fn test_context_keeps_taxonomy() {
        let result: Result<()> = Err(PrepError::Imputation("column 'X' is empty".to_owned()));
        let err = result.context("Numeric imputation failed").unwrap_err();
        assert!(err.is_imputation());
        assert!(err.to_string().contains("Numeric imputation failed"));
    }
}
