//! Integration tests for the full cleaning workflow
//!
//! These tests load fixture files from `testdata/`, run the complete pipeline and check the
//! reassembled table.

use anyhow::Result;
use clusterprep::config::PrepConfig;
use clusterprep::prep::{self, PrepWarning};
use polars::prelude::*;
use std::fmt::Write as _;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn code_column(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::UInt32)?;
    Ok(series.u32()?.into_no_null_iter().collect())
}

#[test]
fn test_clean_cohort_files() -> Result<()> {
    let artifact = prep::clean_files(
        &fixture("cohort.csv"),
        &fixture("cohort_types.csv"),
        &PrepConfig::default(),
    )?;
    let data = artifact.data();

    // S4 has no target and is dropped
    assert_eq!(data.height(), 7);
    let names: Vec<String> = data
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["AGE", "MMSE", "SEX", "APOE", "CDCOMMUN"]);

    for column in data.get_columns() {
        assert_eq!(column.null_count(), 0, "{} still has gaps", column.name());
    }
    for name in ["AGE", "MMSE"] {
        let values = data.column(name)?.as_materialized_series().f64()?.clone();
        for v in values.into_no_null_iter() {
            assert!((0.0..=1.0).contains(&v), "{name} = {v}");
        }
    }

    assert_eq!(code_column(data, "SEX")?, vec![0, 1, 1, 1, 1, 0, 1]);
    assert_eq!(code_column(data, "APOE")?, vec![0, 1, 0, 2, 0, 1, 0]);
    assert_eq!(code_column(data, "CDCOMMUN")?, vec![0, 1, 2, 2, 1, 0, 2]);
    assert_eq!(artifact.target_levels(), &[1.0, 2.0, 3.0]);

    assert_eq!(
        artifact.warnings(),
        &[PrepWarning::UnclassifiedColumns {
            columns: vec!["PTID".to_owned()]
        }]
    );
    Ok(())
}

#[test]
fn test_summary_serializes() -> Result<()> {
    let artifact = prep::clean_files(
        &fixture("cohort.csv"),
        &fixture("cohort_types.csv"),
        &PrepConfig::default(),
    )?;

    let json = serde_json::to_value(artifact.summary())?;
    assert_eq!(json["row_count"], 7);
    assert_eq!(json["target_classes"], 3);
    assert_eq!(json["warnings"][0]["kind"], "unclassified_columns");
    Ok(())
}

#[test]
fn test_type_table_with_two_rows_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("types.csv");
    std::fs::write(&path, "AGE,SEX\nnumeric,nominal\nnumeric,nominal\n")?;

    let err = prep::load_type_table(&path).unwrap_err();
    assert!(err.is_configuration(), "Unexpected error: {err}");
    Ok(())
}

#[test]
fn test_all_missing_numeric_column_aborts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data = dir.path().join("data.csv");
    let types = dir.path().join("types.csv");
    std::fs::write(&data, "X,EMPTY,y\n0.1,,1\n0.5,,2\n0.9,NA,1\n")?;
    std::fs::write(&types, "X,EMPTY,y\nnumeric,numeric,nominal\n")?;

    let config = PrepConfig::default().with_target("y");
    let err = prep::clean_files(&data, &types, &config).unwrap_err();
    assert!(err.is_imputation(), "Unexpected error: {err}");
    Ok(())
}

#[test]
fn test_missing_file_is_reported() {
    let result = prep::clean_files(
        &fixture("does_not_exist.csv"),
        &fixture("cohort_types.csv"),
        &PrepConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_config_file_drives_the_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "target_policy": "keep", "imputer": { "seed": 3, "max_iter": 4 } }"#,
    )?;
    let config = PrepConfig::from_file(&path)?;

    let artifact = prep::clean_files(
        &fixture("cohort.csv"),
        &fixture("cohort_types.csv"),
        &config,
    )?;

    assert_eq!(artifact.target_levels(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(code_column(artifact.data(), "CDCOMMUN")?, vec![0, 1, 2, 3, 1, 0, 2]);
    Ok(())
}

#[test]
fn test_late_values_survive_loading() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data = dir.path().join("late.csv");
    let types = dir.path().join("late_types.csv");

    let mut csv = String::from("site,score,y\n");
    for row in 0..10_005 {
        let site = if row < 10_001 { "1" } else { "B" };
        let score = if row == 10_002 {
            "2.5".to_owned()
        } else {
            (row % 10).to_string()
        };
        writeln!(csv, "{site},{score},{}", row % 3 + 1)?;
    }
    std::fs::write(&data, csv)?;
    std::fs::write(&types, "site,score,y\nnominal,numeric,nominal\n")?;

    let config = PrepConfig::default().with_target("y");
    let artifact = prep::clean_files(&data, &types, &config)?;

    assert_eq!(
        artifact.nominal_levels(),
        &[("site".to_owned(), vec!["1".to_owned(), "B".to_owned()])]
    );
    let frame = artifact.into_data();
    assert_eq!(frame.height(), 10_005);
    assert_eq!(code_column(&frame, "site")?[10_004], 1);

    let score = frame.column("score")?.as_materialized_series().f64()?.clone();
    assert_eq!(score.null_count(), 0);
    let late = score.get(10_002).unwrap_or(f64::NAN);
    assert!((late - 2.5 / 9.0).abs() < 1e-12, "score = {late}");
    Ok(())
}
