//! Sheet reader implementation - spreadsheet region → RawTable

use crate::core::dates::{excel_serial_to_datetime, parse_date_text};
use crate::error::{PimError, PimResult};
use crate::types::{
    dedupe_headers, format_number, CellValue, Column, ColumnSpan, LoadOptions, RawTable,
};
use calamine::{open_workbook_auto, Data, Range, Reader};

/// Text cells that stand for a missing value
const MISSING_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads one fixed region of one sheet into a [`RawTable`]
pub struct SheetReader {
    options: LoadOptions,
}

impl SheetReader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Open the workbook and read the configured region
    pub fn read(&self) -> PimResult<RawTable> {
        let path = &self.options.path;
        if !path.exists() {
            return Err(PimError::MissingFile(path.clone()));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            PimError::Parse(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let available = workbook.sheet_names();
        if !available.iter().any(|name| name == &self.options.sheet) {
            return Err(PimError::MissingSheet {
                sheet: self.options.sheet.clone(),
                available,
            });
        }

        let range = workbook
            .worksheet_range(&self.options.sheet)
            .map_err(|e| {
                PimError::Parse(format!(
                    "Failed to read sheet '{}': {}",
                    self.options.sheet, e
                ))
            })?;

        read_range(
            &self.options.sheet,
            &range,
            self.options.columns,
            self.options.header_row,
        )
    }
}

/// Extract the header row and the data rows below it, limited to `span`.
///
/// Coordinates are absolute sheet positions, so leading blank rows or columns
/// that the workbook does not store still count.
pub fn read_range(
    sheet: &str,
    range: &Range<Data>,
    span: ColumnSpan,
    header_row: usize,
) -> PimResult<RawTable> {
    let (Some(_), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return RawTable::new(sheet, Vec::new());
    };
    let last_row = last_row as usize;
    let last_col = last_col as usize;

    if header_row > last_row {
        return Err(PimError::Parse(format!(
            "Header row {} is below the last used row {} of sheet '{}'",
            header_row + 1,
            last_row + 1,
            sheet
        )));
    }
    if span.first > last_col {
        return RawTable::new(sheet, Vec::new());
    }

    let cols = span.first..=span.last.min(last_col);
    let headers: Vec<String> = cols
        .clone()
        .enumerate()
        .map(|(idx, col)| {
            header_text(cell_at(range, header_row, col))
                .unwrap_or_else(|| format!("Unnamed: {}", idx))
        })
        .collect();
    let headers = dedupe_headers(headers);

    let columns = cols
        .zip(headers)
        .map(|(col, name)| {
            let cells = (header_row + 1..=last_row)
                .map(|row| convert_cell(cell_at(range, row, col)))
                .collect();
            Column::new(name, cells)
        })
        .collect();

    RawTable::new(sheet, columns)
}

fn cell_at(range: &Range<Data>, row: usize, col: usize) -> Option<&Data> {
    range.get_value((row as u32, col as u32))
}

/// Header cell as text; `None` for blank cells
fn header_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Bool(b) => Some(bool_text(*b).to_string()),
        Data::Empty | Data::Error(_) => None,
        other => match convert_cell(Some(other)) {
            CellValue::Empty => None,
            value => Some(value.as_text()),
        },
    }
}

/// Convert a calamine cell into the closed cell model
fn convert_cell(cell: Option<&Data>) -> CellValue {
    let Some(cell) = cell else {
        return CellValue::Empty;
    };
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if MISSING_SENTINELS.contains(&s.as_str()) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(bool_text(*b).to_string()),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_date_text(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        #[allow(unreachable_patterns)]
        other => CellValue::Text(other.to_string()),
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}
