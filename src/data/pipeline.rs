use chrono::NaiveDate;

use super::clean::basic_cleaning;
use super::dates::{coerce_date, date_candidates, date_counts};
use super::model::{ColumnType, Dataset};
use super::transform::{coerce_numeric, select_columns};

/// Per-file processing choices, captured from the side panel.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Apply [`basic_cleaning`] before anything else.
    pub clean: bool,
    /// Columns to keep; empty means all of them.
    pub keep_columns: Vec<String>,
    /// Columns to force to `Number`.
    pub numeric_columns: Vec<String>,
    /// Column to use as the date axis, if any.
    pub date_column: Option<String>,
}

/// Everything the preview table and the charts need, computed in one pass.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    /// Snapshot taken just before the date coercion; the Excel export
    /// serializes this, so choosing a date axis never changes the workbook.
    pub export_dataset: Dataset,
    /// `(name, sum)` for every numeric column, in column order.
    pub column_sums: Vec<(String, f64)>,
    /// Columns eligible for the date axis.
    pub date_candidates: Vec<String>,
    /// Rows per day for the chosen date column; `None` when no valid
    /// column is selected.
    pub date_counts: Option<Vec<(NaiveDate, usize)>>,
}

/// Run the fixed stage order: clean, project columns, numeric coercion,
/// column sums, date-candidate detection, and finally (when a candidate is
/// chosen) the destructive date coercion plus per-day counts.
///
/// Sums are taken before the date coercion on purpose: converting a column
/// to dates must not change what the bar chart shows for the others, and
/// the coerced column itself was not numeric to begin with.
pub fn process(original: &Dataset, config: &PipelineConfig) -> PipelineOutput {
    let cleaned = if config.clean {
        basic_cleaning(original)
    } else {
        original.clone()
    };

    let mut dataset = select_columns(&cleaned, &config.keep_columns);
    coerce_numeric(&mut dataset, &config.numeric_columns);

    let column_sums = dataset
        .columns
        .iter()
        .filter(|col| col.ty == ColumnType::Number)
        .map(|col| (col.name.clone(), col.sum()))
        .collect();

    let candidates = date_candidates(&dataset);

    let export_dataset = dataset.clone();

    // A remembered selection can go stale when the column is deselected or
    // stops qualifying; it is ignored rather than applied.
    let counts = match &config.date_column {
        Some(name) if candidates.contains(name) => {
            coerce_date(&mut dataset, name);
            Some(date_counts(&dataset, name))
        }
        _ => None,
    };

    PipelineOutput {
        dataset,
        export_dataset,
        column_sums,
        date_candidates: candidates,
        date_counts: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn orders() -> Dataset {
        let texts = |raw: &[&str]| {
            raw.iter()
                .map(|s| {
                    if s.is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::Text(s.to_string())
                    }
                })
                .collect::<Vec<_>>()
        };
        Dataset::new(vec![
            Column::new(
                "amount",
                ColumnType::Number,
                vec![
                    CellValue::Number(10.0),
                    CellValue::Number(20.0),
                    CellValue::Number(10.0),
                    CellValue::Null,
                ],
            ),
            Column::new(
                "when",
                ColumnType::Text,
                texts(&["2024-02-01", "2024-02-02", "2024-02-01", "2024-02-02"]),
            ),
            Column::new(
                "note",
                ColumnType::Text,
                texts(&["x", "y", "x", ""]),
            ),
        ])
    }

    #[test]
    fn full_run_cleans_sums_and_counts() {
        let config = PipelineConfig {
            clean: true,
            date_column: Some("when".into()),
            ..PipelineConfig::default()
        };
        let out = process(&orders(), &config);

        // Row 2 duplicates row 0; the null amount takes the median of
        // [10, 20] = 15 after dedup.
        assert_eq!(out.dataset.row_count(), 3);
        assert_eq!(out.column_sums, vec![("amount".to_string(), 45.0)]);

        assert_eq!(out.date_candidates, vec!["when"]);
        assert_eq!(
            out.date_counts,
            Some(vec![(day(1), 1), (day(2), 2)])
        );
        assert_eq!(out.dataset.column("when").unwrap().ty, ColumnType::Date);
    }

    #[test]
    fn without_cleaning_duplicates_survive() {
        let out = process(&orders(), &PipelineConfig::default());
        assert_eq!(out.dataset.row_count(), 4);
        assert_eq!(out.column_sums, vec![("amount".to_string(), 40.0)]);
        assert_eq!(out.date_counts, None);
    }

    #[test]
    fn stale_date_selection_is_ignored() {
        let config = PipelineConfig {
            date_column: Some("note".into()),
            ..PipelineConfig::default()
        };
        let out = process(&orders(), &config);
        assert_eq!(out.date_counts, None);
        assert_eq!(out.dataset.column("note").unwrap().ty, ColumnType::Text);
    }

    #[test]
    fn projection_limits_candidates_and_sums() {
        let config = PipelineConfig {
            keep_columns: vec!["note".into()],
            date_column: Some("when".into()),
            ..PipelineConfig::default()
        };
        let out = process(&orders(), &config);
        assert_eq!(out.dataset.column_names(), vec!["note"]);
        assert!(out.column_sums.is_empty());
        assert!(out.date_candidates.is_empty());
        assert_eq!(out.date_counts, None);
    }

    #[test]
    fn export_snapshot_predates_the_date_coercion() {
        let config = PipelineConfig {
            date_column: Some("when".into()),
            ..PipelineConfig::default()
        };
        let out = process(&orders(), &config);

        assert_eq!(out.dataset.column("when").unwrap().ty, ColumnType::Date);

        let exported = out.export_dataset.column("when").unwrap();
        assert_eq!(exported.ty, ColumnType::Text);
        assert_eq!(exported.values[0], CellValue::Text("2024-02-01".into()));
    }

    #[test]
    fn csv_with_duplicates_and_gaps_cleans_as_expected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(
            &path,
            "id,name,amount,signup_date\n\
             1,alice,10,2024-01-01\n\
             2,,20,2024-01-02\n\
             3,carol,,2024-01-03\n\
             4,dave,40,2024-01-04\n\
             1,alice,10,2024-01-01\n",
        )
        .unwrap();

        let loaded = crate::data::loader::load_file(&path).unwrap();
        let config = PipelineConfig {
            clean: true,
            ..PipelineConfig::default()
        };
        let out = process(&loaded.dataset, &config);

        assert_eq!(out.dataset.row_count(), 4);

        // Median of the surviving amounts [10, 20, 40] fills the gap.
        let amount = out.dataset.column("amount").unwrap();
        assert_eq!(amount.values[2], CellValue::Number(20.0));
        assert_eq!(amount.null_count(), 0);

        let name = out.dataset.column("name").unwrap();
        assert_eq!(name.values[1], CellValue::Text("Missing".into()));

        assert_eq!(out.date_candidates, vec!["signup_date"]);
    }

    #[test]
    fn numeric_override_feeds_the_sums() {
        let ds = Dataset::new(vec![Column::new(
            "qty",
            ColumnType::Text,
            vec![
                CellValue::Text("2".into()),
                CellValue::Text("3".into()),
                CellValue::Text("n/a".into()),
            ],
        )]);
        let config = PipelineConfig {
            numeric_columns: vec!["qty".into()],
            ..PipelineConfig::default()
        };
        let out = process(&ds, &config);
        assert_eq!(out.column_sums, vec![("qty".to_string(), 5.0)]);
    }
}
