use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{CellValue, Dataset};

/// Serialize a dataset to a single-sheet `.xlsx` workbook held in memory.
/// Layout: sheet named `Sheet1`, header row first, one row per record, no
/// index column.  Null cells stay blank; date cells carry a `yyyy-mm-dd`
/// number format so spreadsheet apps show them as dates.
pub fn to_xlsx_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1").context("naming worksheet")?;

    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col_idx, column) in dataset.columns.iter().enumerate() {
        let col = col_idx as u16;
        worksheet
            .write_string(0, col, &column.name)
            .context("writing header row")?;

        for (row_idx, value) in column.values.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match value {
                CellValue::Number(v) => {
                    worksheet.write_number(row, col, *v)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                CellValue::Date(d) => {
                    worksheet.write_datetime_with_format(row, col, d, &date_format)?;
                }
                CellValue::Null => {}
            }
        }
    }

    workbook.save_to_buffer().context("serializing workbook")
}

/// Suggested download name: swap a trailing `.csv` (any case) for `.xlsx`.
pub fn excel_file_name(name: &str) -> String {
    let stem = match name.len().checked_sub(4) {
        Some(split) if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".csv") => {
            &name[..split]
        }
        _ => name,
    };
    format!("{stem}.xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::{Column, ColumnType};
    use chrono::NaiveDate;

    #[test]
    fn workbook_round_trips_through_the_loader() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let ds = Dataset::new(vec![
            Column::new(
                "amount",
                ColumnType::Number,
                vec![
                    CellValue::Number(10.5),
                    CellValue::Null,
                    CellValue::Number(7.0),
                ],
            ),
            Column::new(
                "label",
                ColumnType::Text,
                vec![
                    CellValue::Text("a".into()),
                    CellValue::Text("b".into()),
                    CellValue::Text("c".into()),
                ],
            ),
            Column::new(
                "when",
                ColumnType::Date,
                vec![
                    CellValue::Date(day(1)),
                    CellValue::Date(day(2)),
                    CellValue::Date(day(2)),
                ],
            ),
        ]);

        let bytes = to_xlsx_bytes(&ds).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, bytes).unwrap();

        let loaded = load_file(&path).unwrap().dataset;
        assert_eq!(loaded.column_names(), vec!["amount", "label", "when"]);
        assert_eq!(loaded.row_count(), 3);

        let amount = loaded.column("amount").unwrap();
        assert_eq!(amount.ty, ColumnType::Number);
        assert_eq!(amount.values[0], CellValue::Number(10.5));
        assert!(amount.values[1].is_null());

        let when = loaded.column("when").unwrap();
        assert_eq!(when.ty, ColumnType::Date);
        assert_eq!(when.values[2], CellValue::Date(day(2)));
    }

    #[test]
    fn download_name_swaps_the_extension() {
        assert_eq!(excel_file_name("sales.csv"), "sales.xlsx");
        assert_eq!(excel_file_name("SALES.CSV"), "SALES.xlsx");
        assert_eq!(excel_file_name("no_extension"), "no_extension.xlsx");
    }
}
