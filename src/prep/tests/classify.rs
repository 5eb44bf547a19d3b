use super::*;

fn sample() -> DataFrame {
    DataFrame::new(vec![
        float_col("a", &[Some(1.0), Some(2.0)]),
        str_col("b", &[Some("x"), Some("y")]),
        float_col("c", &[Some(3.0), Some(4.0)]),
        str_col("d", &[Some("p"), Some("q")]),
        int_col("e", &[Some(7), Some(8)]),
    ])
    .unwrap()
}

#[test]
fn test_selection_follows_type_table_order() -> Result<()> {
    let types = ColumnTypeTable::from_pairs([
        ("c", "numeric"),
        ("b", "nominal"),
        ("a", "numeric"),
    ])?;

    let (numeric, cols) = select_by_type(&sample(), &types, &ColumnType::Numeric)?;
    assert_eq!(cols, vec!["c", "a"]);
    assert_eq!(names(&numeric), vec!["c", "a"]);
    assert_eq!(numeric.height(), 2);

    let (nominal, cols) = select_by_type(&sample(), &types, &ColumnType::Nominal)?;
    assert_eq!(cols, vec!["b"]);
    assert_eq!(nominal.width(), 1);
    Ok(())
}

#[test]
fn test_unrecognized_and_unlisted_columns_are_left_out() -> Result<()> {
    let types = ColumnTypeTable::from_pairs([
        ("a", "numeric"),
        ("b", "nominal"),
        ("c", "numeric"),
        ("d", "ordinal"),
    ])?;

    let (numeric, _) = select_by_type(&sample(), &types, &ColumnType::Numeric)?;
    let (nominal, _) = select_by_type(&sample(), &types, &ColumnType::Nominal)?;
    assert_eq!(numeric.width() + nominal.width(), 3);

    assert_eq!(unclassified_columns(&sample(), &types), vec!["d", "e"]);
    Ok(())
}

#[test]
fn test_empty_group() -> Result<()> {
    let types = ColumnTypeTable::from_pairs([("a", "numeric")])?;
    let (nominal, cols) = select_by_type(&sample(), &types, &ColumnType::Nominal)?;
    assert!(cols.is_empty());
    assert_eq!(nominal.width(), 0);
    Ok(())
}

#[test]
fn test_declared_column_absent_from_dataset() -> Result<()> {
    let types = ColumnTypeTable::from_pairs([("a", "numeric"), ("zz", "numeric")])?;
    let err = select_by_type(&sample(), &types, &ColumnType::Numeric).unwrap_err();
    assert!(err.is_configuration(), "Unexpected error: {err}");
    Ok(())
}
