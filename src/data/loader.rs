use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use thiserror::Error;

use super::dates::parse_date;
use super::model::{CellValue, Column, ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while turning a file into a [`Dataset`].
/// Failures are scoped to the one file being loaded; callers keep processing
/// their remaining files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type: .{0}")]
    UnsupportedType(String),
    #[error("Error reading CSV file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Error reading Excel file: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("Excel workbook has no sheets")]
    EmptyWorkbook,
    #[error("file has no header row")]
    EmptyHeader,
}

/// Format the file was parsed from.  Excel export is only offered for
/// CSV-origin datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Excel,
}

/// A parsed file: its display name, origin format, and the dataset itself.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub format: SourceFormat,
    pub dataset: Dataset,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension
/// (case-insensitive):
///
/// * `.csv`  – header row plus one record per line
/// * `.xlsx` – first worksheet, first row treated as the header
///
/// Anything else is an unsupported-type error, raised before any I/O.
pub fn load_file(path: &Path) -> Result<LoadedFile, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("dataset")
        .to_string();

    let (format, dataset) = match ext.as_str() {
        "csv" => (SourceFormat::Csv, load_csv(path)?),
        "xlsx" => (SourceFormat::Excel, load_xlsx(path)?),
        other => return Err(LoadError::UnsupportedType(other.to_string())),
    };

    Ok(LoadedFile {
        name,
        format,
        dataset,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.  Empty
/// fields are missing values.  A column where every non-missing field parses
/// as a float becomes a `Number` column (so an entirely empty column is an
/// all-null numeric one); everything else loads as `Text`.
fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(LoadError::EmptyHeader);
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Ok(Dataset::new(columns))
}

/// Type a raw string column: `Number` if every non-empty field parses,
/// otherwise `Text`.  Rust's float parser accepts `nan`, which
/// [`CellValue::from_number`] folds back into the null marker.
fn infer_column(name: String, raw: Vec<String>) -> Column {
    let mut parsed: Vec<Option<f64>> = Vec::with_capacity(raw.len());
    let mut numeric = true;
    for field in &raw {
        if field.is_empty() {
            parsed.push(None);
            continue;
        }
        match field.trim().parse::<f64>() {
            Ok(n) => parsed.push(Some(n)),
            Err(_) => {
                numeric = false;
                parsed.push(None);
            }
        }
    }

    if numeric {
        let values = parsed
            .into_iter()
            .map(|p| match p {
                Some(n) => CellValue::from_number(n),
                None => CellValue::Null,
            })
            .collect();
        Column::new(name, ColumnType::Number, values)
    } else {
        let values = raw
            .into_iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(field)
                }
            })
            .collect();
        Column::new(name, ColumnType::Text, values)
    }
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Rough classification of a workbook cell, used for column typing.
enum CellKind {
    Missing,
    Numberish,
    Dateish,
    Textish,
}

fn kind_of(cell: &Data) -> CellKind {
    match cell {
        Data::Empty | Data::Error(_) => CellKind::Missing,
        Data::Float(_) | Data::Int(_) => CellKind::Numberish,
        Data::DateTime(_) | Data::DateTimeIso(_) => CellKind::Dateish,
        Data::String(_) | Data::Bool(_) | Data::DurationIso(_) => CellKind::Textish,
    }
}

/// Load the first worksheet of an `.xlsx` workbook.  The first row is the
/// header (blank header cells get `Unnamed: {idx}` names).  Native date
/// cells yield a `Date` column when the whole column is date-or-empty,
/// numeric cells likewise yield `Number`; any mix degrades to `Text`.
fn load_xlsx(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::EmptyHeader)?;
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = cell_to_text(cell);
            if text.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                text
            }
        })
        .collect();

    let body: Vec<&[Data]> = rows.collect();

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(col_idx).unwrap_or(&Data::Empty))
                .collect();
            build_xlsx_column(name, &cells)
        })
        .collect();

    Ok(Dataset::new(columns))
}

fn build_xlsx_column(name: String, cells: &[&Data]) -> Column {
    let mut all_number = true;
    let mut all_date = true;
    for cell in cells {
        match kind_of(cell) {
            CellKind::Missing => {}
            CellKind::Numberish => all_date = false,
            CellKind::Dateish => all_number = false,
            CellKind::Textish => {
                all_number = false;
                all_date = false;
            }
        }
    }

    if all_number {
        let values = cells
            .iter()
            .map(|cell| match cell {
                Data::Float(v) => CellValue::from_number(*v),
                Data::Int(v) => CellValue::from_number(*v as f64),
                _ => CellValue::Null,
            })
            .collect();
        Column::new(name, ColumnType::Number, values)
    } else if all_date {
        let values = cells
            .iter()
            .map(|cell| match cell_to_date(cell) {
                Some(d) => CellValue::Date(d),
                None => CellValue::Null,
            })
            .collect();
        Column::new(name, ColumnType::Date, values)
    } else {
        let values = cells
            .iter()
            .map(|cell| match kind_of(cell) {
                CellKind::Missing => CellValue::Null,
                _ => CellValue::Text(cell_to_text(cell)),
            })
            .collect();
        Column::new(name, ColumnType::Text, values)
    }
}

fn cell_to_date(cell: &Data) -> Option<chrono::NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|ndt| ndt.date()),
        Data::DateTimeIso(s) => parse_date(s),
        _ => None,
    }
}

fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.date().to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
