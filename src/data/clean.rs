use std::collections::HashSet;

use super::model::{CellValue, Column, ColumnType, Dataset};

/// Placeholder written into missing text cells during cleaning.
pub const MISSING_TEXT: &str = "Missing";

/// Basic cleaning pass: drop duplicate rows (first occurrence wins), then
/// fill missing values per column type.  Numeric nulls take the column
/// median computed after deduplication; text nulls become [`MISSING_TEXT`].
/// Date columns pass through untouched.
///
/// A numeric column with no values at all has no median, so its nulls stay
/// null.
pub fn basic_cleaning(dataset: &Dataset) -> Dataset {
    let deduped = drop_duplicate_rows(dataset);
    fill_missing(&deduped)
}

fn drop_duplicate_rows(dataset: &Dataset) -> Dataset {
    let mut seen: HashSet<Vec<CellValue>> = HashSet::new();
    let mut keep: Vec<usize> = Vec::new();
    for idx in 0..dataset.row_count() {
        if seen.insert(dataset.row(idx)) {
            keep.push(idx);
        }
    }

    let columns = dataset
        .columns
        .iter()
        .map(|col| {
            let values = keep.iter().map(|&i| col.values[i].clone()).collect();
            Column::new(col.name.clone(), col.ty, values)
        })
        .collect();
    Dataset::new(columns)
}

fn fill_missing(dataset: &Dataset) -> Dataset {
    let columns = dataset
        .columns
        .iter()
        .map(|col| {
            let values = match col.ty {
                ColumnType::Number => {
                    let median = col.median();
                    col.values
                        .iter()
                        .map(|v| {
                            if v.is_null() {
                                CellValue::from_number(median)
                            } else {
                                v.clone()
                            }
                        })
                        .collect()
                }
                ColumnType::Text => col
                    .values
                    .iter()
                    .map(|v| {
                        if v.is_null() {
                            CellValue::Text(MISSING_TEXT.to_string())
                        } else {
                            v.clone()
                        }
                    })
                    .collect(),
                ColumnType::Date => col.values.clone(),
            };
            Column::new(col.name.clone(), col.ty, values)
        })
        .collect();
    Dataset::new(columns)
}
