use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Tokens read as a missing value rather than as text.
const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed scalar mirroring the dtypes a spreadsheet import yields.
/// Columns are grouped into `BTreeSet`s for legends, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

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
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer the value of a raw cell: missing marker, integer, float, or text.
    ///
    /// A whole number too wide for `i64` stays text, so none of its digits
    /// are rounded away by a float conversion.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NA_MARKERS.contains(&trimmed) {
            return CellValue::Null;
        }
        if is_integer_literal(trimmed) {
            return match trimmed.parse::<i64>() {
                Ok(i) => CellValue::Integer(i),
                Err(_) => CellValue::Text(raw.to_string()),
            };
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Optional sign followed by ASCII digits only.
fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

/// One named column. Missing cells are `CellValue::Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric when every non-missing cell is a number. A column with no
    /// values at all is numeric too, the way an all-NaN float column is.
    pub fn column_type(&self) -> ColumnType {
        if self.values.iter().all(|v| v.is_null() || v.is_numeric()) {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }

    /// Sorted distinct non-missing values, used for category legends.
    pub fn unique_values(&self) -> BTreeSet<CellValue> {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }
}

/// An ordered set of equally long columns extracted from one document region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table from columns, which must all hold the same number of values.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != num_rows) {
            return Err(PipelineError::ExtractionFailure(format!(
                "column '{}' has {} values but expected {num_rows}",
                bad.name,
                bad.values.len()
            )));
        }
        Ok(Table { columns, num_rows })
    }

    /// Build a table from a header and row-oriented raw records, inferring
    /// each cell's type. Duplicate header names get `.1`, `.2`, ... suffixes.
    pub fn from_records(headers: &[String], records: &[Vec<String>]) -> Result<Self> {
        let names = dedup_headers(headers);
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(records.len())))
            .collect();

        for (row_no, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(PipelineError::ExtractionFailure(format!(
                    "row {row_no}: expected {} fields, found {}",
                    columns.len(),
                    record.len()
                )));
            }
            for (column, raw) in columns.iter_mut().zip(record) {
                column.values.push(CellValue::parse(raw));
            }
        }

        Table::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Cells of row `index` in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.num_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.num_rows).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}

fn dedup_headers(headers: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut name = header.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{header}.{suffix}");
            suffix += 1;
        }
        seen.push(name);
    }
    seen
}

// ---------------------------------------------------------------------------
// Dataset – the normalized result
// ---------------------------------------------------------------------------

/// The concatenated table plus its column classification.
///
/// Only the normalizer builds a `Dataset`; afterwards it is read-only, and
/// `numeric_columns` is always an ordered subset of `all_columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    table: Table,
    numeric_columns: Vec<String>,
    all_columns: Vec<String>,
}

impl Dataset {
    pub(crate) fn from_table(table: Table) -> Self {
        let all_columns: Vec<String> = table.column_names().map(str::to_string).collect();
        let numeric_columns = table
            .columns()
            .iter()
            .filter(|c| c.column_type() == ColumnType::Numeric)
            .map(|c| c.name.clone())
            .collect();
        Dataset {
            table,
            numeric_columns,
            all_columns,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn all_columns(&self) -> &[String] {
        &self.all_columns
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.all_columns.iter().any(|c| c == column)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.column(name)
    }

    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        self.table.row(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        self.table.rows()
    }

    /// First `n` rows, for the uploaded-data preview.
    pub fn preview(&self, n: usize) -> Vec<Vec<&CellValue>> {
        self.rows().take(n).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.num_rows()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.table.num_rows() == 0
    }
}
