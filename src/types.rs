use crate::error::{PimError, PimResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

//==============================================================================
// Cell values
//==============================================================================

/// A loosely typed spreadsheet cell, closed over the shapes a PIM sheet holds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    /// Missing value; serializes as `null`
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty, or text that is nothing but whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Display text of the cell. Integral numbers drop the fractional part.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "Text",
            CellValue::Number(_) => "Number",
            CellValue::Date(_) => "Date",
            CellValue::Empty => "Empty",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Format a number the way a spreadsheet shows it: `2` rather than `2.0`
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

//==============================================================================
// Tables
//==============================================================================

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when no cell in the column holds a value
    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// Verbatim parse of the sheet region: headers as found, one column per header
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub sheet: String,
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl RawTable {
    pub fn new(sheet: impl Into<String>, columns: Vec<Column>) -> PimResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        validate_lengths(&columns, row_count)?;
        Ok(Self {
            sheet: sheet.into(),
            columns,
            row_count,
        })
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Build a table from header names and row-major records
    pub fn from_rows(
        sheet: impl Into<String>,
        headers: &[&str],
        rows: Vec<Vec<CellValue>>,
    ) -> PimResult<Self> {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(*h, Vec::with_capacity(rows.len())))
            .collect();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(PimError::Parse(format!(
                    "Row {} has {} cells, expected {}",
                    idx,
                    row.len(),
                    headers.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }
        Self::new(sheet, columns)
    }
}

/// The cleaned table handed to the presentation layer.
///
/// Only the normalizer builds these, so the column invariants hold for every
/// instance: no blank, all-digit, `Unnamed*` or `|*` names, no all-empty
/// columns, and a trailing "Complete Status" column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl NormalizedTable {
    pub(crate) fn new(columns: Vec<Column>, row_count: usize) -> PimResult<Self> {
        validate_lengths(&columns, row_count)?;
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }
}

fn validate_lengths(columns: &[Column], row_count: usize) -> PimResult<()> {
    for column in columns {
        if column.len() != row_count {
            return Err(PimError::Parse(format!(
                "Column '{}' has {} rows, expected {} rows",
                column.name,
                column.len(),
                row_count
            )));
        }
    }
    Ok(())
}

/// Disambiguate repeated headers as `X`, `X.1`, `X.2`, …
///
/// Blank names are left alone; they never reach the grid.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        if header.is_empty() {
            result.push(header);
            continue;
        }
        let mut count = seen.get(&header).copied().unwrap_or(0);
        let mut name = header.clone();
        while count > 0 {
            name = format!("{}.{}", header, count);
            if !seen.contains_key(&name) {
                break;
            }
            count += 1;
        }
        seen.insert(header.clone(), count + 1);
        if name != header {
            seen.insert(name.clone(), 1);
        }
        result.push(name);
    }

    result
}

//==============================================================================
// Load parameters
//==============================================================================

/// Workbook shipped with the PIM Lite export
pub const DEFAULT_FILE: &str = "250408_PIM Lite Consolidated.xlsx";
pub const DEFAULT_SHEET: &str = "PIM";
/// Row 0 is a banner; headers sit on the second physical row
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Inclusive, zero-based column range such as `A:U`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    pub first: usize,
    pub last: usize,
}

impl ColumnSpan {
    pub fn new(first: usize, last: usize) -> PimResult<Self> {
        if first > last {
            return Err(PimError::InvalidColumnSpan(format!(
                "{}:{} ends before it starts",
                column_letter(first),
                column_letter(last)
            )));
        }
        Ok(Self { first, last })
    }

    pub fn width(&self) -> usize {
        self.last - self.first + 1
    }
}

impl Default for ColumnSpan {
    /// `A:U`, the first 21 columns
    fn default() -> Self {
        Self { first: 0, last: 20 }
    }
}

impl fmt::Display for ColumnSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", column_letter(self.first), column_letter(self.last))
    }
}

impl FromStr for ColumnSpan {
    type Err = PimError;

    fn from_str(s: &str) -> PimResult<Self> {
        let (first, last) = s.split_once(':').unwrap_or((s, s));
        let first = column_index(first.trim())
            .ok_or_else(|| PimError::InvalidColumnSpan(s.to_string()))?;
        let last = column_index(last.trim())
            .ok_or_else(|| PimError::InvalidColumnSpan(s.to_string()))?;
        Self::new(first, last)
    }
}

/// Convert column index to Excel column letter (0→A, 25→Z, 26→AA)
pub fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

/// Convert Excel column letters to a zero-based index (A→0, AA→26)
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut index = 0usize;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Everything that identifies one parse of one sheet; also the cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    pub path: PathBuf,
    pub sheet: String,
    pub columns: ColumnSpan,
    pub header_row: usize,
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
            columns: ColumnSpan::default(),
            header_row: DEFAULT_HEADER_ROW,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(DEFAULT_FILE, DEFAULT_SHEET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(20), "U");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("u"), Some(20));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AAA"), Some(702));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn test_column_span_parse() {
        let span: ColumnSpan = "A:U".parse().unwrap();
        assert_eq!(span, ColumnSpan::default());
        assert_eq!(span.width(), 21);
        assert_eq!(span.to_string(), "A:U");

        let single: ColumnSpan = "C".parse().unwrap();
        assert_eq!(single.width(), 1);

        assert!("U:A".parse::<ColumnSpan>().is_err());
        assert!("1:3".parse::<ColumnSpan>().is_err());
    }

    #[test]
    fn test_cell_text_formats_integral_numbers() {
        assert_eq!(CellValue::Number(2.0).as_text(), "2");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Empty.as_text(), "");
        let date = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::Date(date).as_text(), "2024-03-05 00:00:00");
    }

    #[test]
    fn test_dedupe_headers_skips_blank_names() {
        let headers = vec!["", "Name", "", "Name"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedupe_headers(headers), vec!["", "Name", "", "Name.1"]);
    }

    #[test]
    fn test_cell_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Text(" x ".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_serializes_untagged() {
        let cells = vec![
            CellValue::Text("Bag".to_string()),
            CellValue::Number(2.0),
            CellValue::Empty,
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"["Bag",2.0,null]"#);
    }

    #[test]
    fn test_raw_table_from_rows_rejects_ragged_rows() {
        let result = RawTable::from_rows(
            "PIM",
            &["Name", "Brand"],
            vec![vec![CellValue::Text("Bag".to_string())]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_normalized_table_rows() {
        let table = NormalizedTable::new(
            vec![
                Column::new("Name", vec![CellValue::Text("Bag".into())]),
                Column::new("Count", vec![CellValue::Number(1.0)]),
            ],
            1,
        )
        .unwrap();
        assert_eq!(table.row_count(), 1);
        let row = table.row(0).unwrap();
        assert_eq!(row.len(), 2);
        assert!(table.row(1).is_none());
        assert_eq!(table.rows().count(), 1);
    }
}
