#![expect(clippy::unwrap_used)]
use super::*;
use anyhow::Result;
use polars::prelude::*;

mod classify;

fn float_col(name: &str, values: &[Option<f64>]) -> Column {
    Column::from(Series::new(name.into(), values.to_vec()))
}

fn int_col(name: &str, values: &[Option<i64>]) -> Column {
    Column::from(Series::new(name.into(), values.to_vec()))
}

fn str_col(name: &str, values: &[Option<&str>]) -> Column {
    Column::from(Series::new(name.into(), values.to_vec()))
}

fn codes(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
    Ok(cells::code_cells(df.column(name)?)?)
}

fn floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(cells::float_cells(df.column(name)?)?)
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn test_type_table_from_frame() -> Result<()> {
    let df = DataFrame::new(vec![
        str_col("AGE", &[Some("numeric")]),
        str_col("SEX", &[Some("nominal")]),
        str_col("NOTE", &[Some("text")]),
    ])?;
    let table = ColumnTypeTable::from_frame(&df)?;

    assert_eq!(table.len(), 3);
    assert_eq!(table.get("AGE"), Some(&ColumnType::Numeric));
    assert_eq!(table.get("SEX"), Some(&ColumnType::Nominal));
    assert_eq!(
        table.get("NOTE"),
        Some(&ColumnType::Unrecognized("text".to_owned()))
    );
    Ok(())
}

#[test]
fn test_type_table_needs_one_row() -> Result<()> {
    let df = DataFrame::new(vec![str_col("AGE", &[Some("numeric"), Some("numeric")])])?;
    let err = ColumnTypeTable::from_frame(&df).unwrap_err();
    assert!(err.is_configuration(), "Unexpected error: {err}");
    Ok(())
}

#[test]
fn test_type_table_rejects_duplicates() {
    let err = ColumnTypeTable::from_pairs([("a", "numeric"), ("a", "nominal")]).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_type_tags_are_case_sensitive() {
    assert_eq!(ColumnType::parse("numeric"), ColumnType::Numeric);
    assert_eq!(
        ColumnType::parse("Numeric"),
        ColumnType::Unrecognized("Numeric".to_owned())
    );
}
