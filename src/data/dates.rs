use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{CellValue, ColumnType, Dataset};

/// Date-only formats probed in order when coaxing text into dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Timestamp formats probed after the date-only ones; the time part is
/// discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date out of free text, trying each known format in turn.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn cell_to_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date(s),
        // Bare numbers are never dates; treating them as epoch offsets
        // turns every numeric column into a bogus candidate.
        CellValue::Number(_) | CellValue::Null => None,
    }
}

/// Columns worth offering as a date axis: strictly more than half of the
/// dataset's rows must yield a date.
pub fn date_candidates(dataset: &Dataset) -> Vec<String> {
    let total = dataset.row_count();
    if total == 0 {
        return Vec::new();
    }
    dataset
        .columns
        .iter()
        .filter(|col| {
            let hits = col.values.iter().filter(|v| cell_to_date(v).is_some()).count();
            hits * 2 > total
        })
        .map(|col| col.name.clone())
        .collect()
}

/// Rewrite the named column in place as a `Date` column.  Anything that
/// does not yield a date becomes null.  Unknown names are a no-op.
pub fn coerce_date(dataset: &mut Dataset, column: &str) {
    if let Some(col) = dataset.column_mut(column) {
        for value in &mut col.values {
            *value = match cell_to_date(value) {
                Some(d) => CellValue::Date(d),
                None => CellValue::Null,
            };
        }
        col.ty = ColumnType::Date;
    }
}

/// Rows per calendar date in the named column, ascending by date.  Null
/// cells do not contribute a bucket.
pub fn date_counts(dataset: &Dataset, column: &str) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    if let Some(col) = dataset.column(column) {
        for value in &col.values {
            if let CellValue::Date(d) = value {
                *counts.entry(*d).or_insert(0) += 1;
            }
        }
    }
    counts.into_iter().collect()
}
