//! # clusterprep - cleaning mixed tabular data ahead of clustering
//!
//! clusterprep turns a raw table of nominal and numeric columns with gaps into a single
//! analysis-ready table. It is driven by a separate column type table that declares every
//! feature column `nominal` or `numeric`, and by the name of an ordinal target column.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clusterprep::config::PrepConfig;
//! use clusterprep::prep;
//! use std::path::Path;
//!
//! # fn example() -> clusterprep::error::Result<()> {
//! let config = PrepConfig::default().with_target("CDCOMMUN");
//! let artifact = prep::clean_files(
//!     Path::new("data.csv"),
//!     Path::new("data_types.csv"),
//!     &config,
//! )?;
//!
//! println!("{} rows ready", artifact.data().height());
//! for warning in artifact.warnings() {
//!     println!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! raw table + type table
//!   │
//!   ├─> target::recode_target        drop unknown-target rows, merge top classes, recode
//!   ├─> classify::select_by_type     nominal group
//!   ├─> nominal::repair_and_encode   mode repair, first-occurrence ordinal codes
//!   ├─> classify::select_by_type     numeric group
//!   ├─> normalize::normalize         per-column min-max scaling
//!   ├─> indicator::expand_indicators nominal + target indicator views
//!   ├─> impute::MultivariateImputer  round-robin regression imputation
//!   └─> CleanDataArtifact            numeric | nominal | target
//! ```
//!
//! ## Modules
//!
//! - [`prep`]: the cleaning components and the pipeline that chains them
//! - [`config`]: serde-backed run configuration
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup for binaries

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod prep;
