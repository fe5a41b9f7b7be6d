use super::model::{CellValue, ColumnType, Dataset};

/// Keep only the named columns, in the requested order.  An empty list
/// keeps everything; names that do not exist are skipped.
pub fn select_columns(dataset: &Dataset, names: &[String]) -> Dataset {
    if names.is_empty() {
        return dataset.clone();
    }
    let columns = names
        .iter()
        .filter_map(|name| dataset.column(name).cloned())
        .collect();
    Dataset::new(columns)
}

/// Force the named columns to `Number`.  Text goes through a trimmed float
/// parse; anything unparseable, and every date, becomes null.  The
/// conversion is total so the column type can be set unconditionally.
pub fn coerce_numeric(dataset: &mut Dataset, names: &[String]) {
    for name in names {
        let Some(col) = dataset.column_mut(name) else {
            continue;
        };
        for value in &mut col.values {
            *value = match &*value {
                CellValue::Number(v) => CellValue::from_number(*v),
                CellValue::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) => CellValue::from_number(n),
                    Err(_) => CellValue::Null,
                },
                CellValue::Date(_) | CellValue::Null => CellValue::Null,
            };
        }
        col.ty = ColumnType::Number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "a",
                ColumnType::Number,
                vec![CellValue::Number(1.0), CellValue::Number(2.0)],
            ),
            Column::new(
                "b",
                ColumnType::Text,
                vec![
                    CellValue::Text("3.5".into()),
                    CellValue::Text("oops".into()),
                ],
            ),
        ])
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let ds = sample();
        let selected = select_columns(&ds, &[]);
        assert_eq!(selected, ds);
    }

    #[test]
    fn full_selection_in_dataset_order_is_a_no_op() {
        let ds = sample();
        let selected = select_columns(&ds, &ds.column_names());
        assert_eq!(selected, ds);
    }

    #[test]
    fn selection_projects_and_reorders() {
        let ds = sample();
        let selected = select_columns(&ds, &["b".into(), "a".into()]);
        assert_eq!(selected.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn unknown_selection_names_are_skipped() {
        let ds = sample();
        let selected = select_columns(&ds, &["ghost".into(), "a".into()]);
        assert_eq!(selected.column_names(), vec!["a"]);
    }

    #[test]
    fn numeric_coercion_parses_text_and_nulls_the_rest() {
        let mut ds = sample();
        coerce_numeric(&mut ds, &["b".into()]);

        let b = ds.column("b").unwrap();
        assert_eq!(b.ty, ColumnType::Number);
        assert_eq!(b.values[0], CellValue::Number(3.5));
        assert!(b.values[1].is_null());
    }

    #[test]
    fn numeric_coercion_nulls_dates() {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut ds = Dataset::new(vec![Column::new(
            "when",
            ColumnType::Date,
            vec![CellValue::Date(day)],
        )]);
        coerce_numeric(&mut ds, &["when".into()]);

        let col = ds.column("when").unwrap();
        assert_eq!(col.ty, ColumnType::Number);
        assert!(col.values[0].is_null());
    }

    #[test]
    fn coercing_an_unknown_column_is_a_no_op() {
        let mut ds = sample();
        let before = ds.clone();
        coerce_numeric(&mut ds, &["ghost".into()]);
        assert_eq!(ds, before);
    }
}
