use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes the pipeline cares
/// about. Deduplication and date grouping put cells in hash sets and
/// `BTreeMap`s, so `CellValue` must be `Eq` + `Ord` + `Hash` even though it
/// carries an `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord/Hash so rows of cells can act as dedup keys --
//
// NaN never reaches these impls: `from_number` normalizes it to Null, so the
// derived PartialEq on the Number payload is total in practice.

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Number(_) => 1,
                Text(_) => 2,
                Date(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Number(v) => v.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", format_number(*v)),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Wrap an `f64`, normalizing NaN to the null marker. Every code path
    /// that stores a numeric cell goes through here, which keeps the
    /// "undefined median" edge case an ordinary fill with a missing value.
    pub fn from_number(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Null
        } else {
            CellValue::Number(v)
        }
    }

    /// Interpret the cell as an `f64` if it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Render a number the way a table viewer expects: no trailing `.0` on
/// integral values, at most six fractional digits otherwise.
fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}

// ---------------------------------------------------------------------------
// Column – one named, homogeneously typed column
// ---------------------------------------------------------------------------

/// Declared type of a column. Non-null cells of a column always match its
/// declared type; `Null` is allowed everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Text,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Number => write!(f, "number"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            ty,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Median of the non-null numeric cells. Returns NaN when the column has
    /// no numeric values at all, mirroring the undefined median of an empty
    /// series.
    pub fn median(&self) -> f64 {
        let mut numbers: Vec<f64> = self.values.iter().filter_map(CellValue::as_number).collect();
        if numbers.is_empty() {
            return f64::NAN;
        }
        numbers.sort_by(f64::total_cmp);
        let mid = numbers.len() / 2;
        if numbers.len() % 2 == 1 {
            numbers[mid]
        } else {
            (numbers[mid - 1] + numbers[mid]) / 2.0
        }
    }

    /// Sum of the non-null numeric cells; 0.0 for an all-null column.
    pub fn sum(&self) -> f64 {
        self.values.iter().filter_map(CellValue::as_number).sum()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete in-memory table
// ---------------------------------------------------------------------------

/// An ordered sequence of named columns aligned by row index. Every pipeline
/// stage consumes and produces this shape; nothing survives an interaction
/// except the originally parsed dataset it is recomputed from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset from columns. All columns must already be aligned.
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "dataset columns must have equal length"
        );
        Dataset { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// One row as a cell vector in column order. Used as a dedup key, so the
    /// clones are deliberate.
    pub fn row(&self, idx: usize) -> Vec<CellValue> {
        self.columns.iter().map(|c| c.values[idx].clone()).collect()
    }

    /// Names of the columns currently typed as numeric.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.ty == ColumnType::Number)
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    #[test]
    fn from_number_normalizes_nan_to_null() {
        assert_eq!(CellValue::from_number(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::from_number(1.5), CellValue::Number(1.5));
    }

    #[test]
    fn median_odd_and_even_counts() {
        let odd = Column::new("a", ColumnType::Number, vec![num(3.0), num(1.0), num(2.0)]);
        assert_eq!(odd.median(), 2.0);

        let even = Column::new(
            "a",
            ColumnType::Number,
            vec![num(4.0), num(1.0), num(3.0), num(2.0)],
        );
        assert_eq!(even.median(), 2.5);
    }

    #[test]
    fn median_skips_nulls_and_is_nan_when_empty() {
        let sparse = Column::new(
            "a",
            ColumnType::Number,
            vec![CellValue::Null, num(10.0), CellValue::Null, num(20.0)],
        );
        assert_eq!(sparse.median(), 15.0);

        let empty = Column::new(
            "a",
            ColumnType::Number,
            vec![CellValue::Null, CellValue::Null],
        );
        assert!(empty.median().is_nan());
    }

    #[test]
    fn sum_skips_nulls_and_defaults_to_zero() {
        let col = Column::new(
            "a",
            ColumnType::Number,
            vec![num(1.0), CellValue::Null, num(2.5)],
        );
        assert_eq!(col.sum(), 3.5);

        let all_null = Column::new("a", ColumnType::Number, vec![CellValue::Null]);
        assert_eq!(all_null.sum(), 0.0);
    }

    #[test]
    fn display_formats_integral_numbers_without_decimals() {
        assert_eq!(num(5.0).to_string(), "5");
        assert_eq!(num(5.25).to_string(), "5.25");
        assert_eq!(CellValue::Null.to_string(), "<null>");
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::Date(d).to_string(), "2024-03-09");
    }

    #[test]
    fn rows_clone_cells_in_column_order() {
        let ds = Dataset::new(vec![
            Column::new("id", ColumnType::Number, vec![num(1.0), num(2.0)]),
            Column::new(
                "name",
                ColumnType::Text,
                vec![CellValue::Text("a".into()), CellValue::Text("b".into())],
            ),
        ]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.row(1), vec![num(2.0), CellValue::Text("b".into())]);
    }
}
