//! Column-shaping pipeline: RawTable → NormalizedTable
//!
//! The rules run in a fixed order; later rules assume the earlier ones
//! have already removed placeholder and blank headers.

use super::dates::{coerce_date, format_day_first};
use crate::error::{PimError, PimResult};
use crate::types::{dedupe_headers, CellValue, Column, NormalizedTable, RawTable};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Classification attributes every product row must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["Macro Material_", "Main Color_", "Shape_", "Carry_"];

/// Derived completeness flag, always the last column
pub const COMPLETE_STATUS: &str = "Complete Status";

/// Date column reformatted to `DD/MM/YYYY`
pub const ADDED: &str = "Added";

/// Known spurious duplicate produced by the source workbook
pub const SPURIOUS_DUPLICATE: &str = "Column2";

/// Fields removed from the grid by exact name
pub const EXCLUDED_COLUMNS: [&str; 3] = ["Complete?", "Model", "Size"];

fn placeholder_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Unnamed").expect("valid regex"))
}

fn separator_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\|").expect("valid regex"))
}

fn numeric_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid regex"))
}

/// Why a column did not survive normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// `Unnamed…` header left by a blank header cell
    Placeholder,
    BlankName,
    AllEmpty,
    /// Header starting with `|`
    Separator,
    Numeric,
    SpuriousDuplicate,
    Excluded,
    /// A source column named like the derived completeness flag
    Replaced,
}

impl DropReason {
    pub fn describe(&self) -> &'static str {
        match self {
            DropReason::Placeholder => "placeholder header",
            DropReason::BlankName => "blank header",
            DropReason::AllEmpty => "no values",
            DropReason::Separator => "separator column",
            DropReason::Numeric => "numeric header",
            DropReason::SpuriousDuplicate => "spurious duplicate",
            DropReason::Excluded => "excluded field",
            DropReason::Replaced => "replaced by derived column",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedColumn {
    pub name: String,
    pub reason: DropReason,
}

/// What normalization removed and recovered from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub dropped: Vec<DroppedColumn>,
    /// `Added` cells holding something that is not a date
    pub unparseable_dates: usize,
    pub incomplete_rows: usize,
}

impl NormalizationReport {
    pub fn dropped_for(&self, reason: DropReason) -> Vec<&str> {
        self.dropped
            .iter()
            .filter(|d| d.reason == reason)
            .map(|d| d.name.as_str())
            .collect()
    }
}

/// Run the full cleaning pipeline over a raw sheet extract
pub fn normalize(raw: &RawTable) -> PimResult<(NormalizedTable, NormalizationReport)> {
    let mut report = NormalizationReport::default();
    // Trimming can make two distinct headers equal, so disambiguate again
    let names = dedupe_headers(raw.columns.iter().map(|c| c.name.trim().to_string()).collect());
    let mut columns: Vec<Column> = raw
        .columns
        .iter()
        .zip(names)
        .map(|(c, name)| Column::new(name, c.cells.clone()))
        .collect();

    drop_where(&mut columns, &mut report, DropReason::Placeholder, |c| {
        placeholder_pattern().is_match(&c.name)
    });
    drop_where(&mut columns, &mut report, DropReason::BlankName, |c| {
        c.name.is_empty()
    });
    drop_where(&mut columns, &mut report, DropReason::AllEmpty, |c| {
        c.is_all_empty()
    });
    drop_where(&mut columns, &mut report, DropReason::Separator, |c| {
        separator_pattern().is_match(&c.name)
    });
    drop_where(&mut columns, &mut report, DropReason::Numeric, |c| {
        numeric_pattern().is_match(&c.name)
    });
    drop_where(&mut columns, &mut report, DropReason::SpuriousDuplicate, |c| {
        c.name == SPURIOUS_DUPLICATE
    });

    for column in columns.iter_mut().filter(|c| c.name == ADDED) {
        report.unparseable_dates += reformat_dates(column);
    }
    // An `Added` column whose every value failed to parse is now empty
    drop_where(&mut columns, &mut report, DropReason::AllEmpty, |c| {
        c.name == ADDED && c.is_all_empty()
    });

    drop_where(&mut columns, &mut report, DropReason::Excluded, |c| {
        EXCLUDED_COLUMNS.contains(&c.name.as_str())
    });

    let status = complete_status(&columns, raw.row_count)?;
    report.incomplete_rows = status.iter().filter(|&&complete| !complete).count();
    drop_where(&mut columns, &mut report, DropReason::Replaced, |c| {
        c.name == COMPLETE_STATUS
    });
    columns.push(Column::new(
        COMPLETE_STATUS,
        status
            .into_iter()
            .map(|complete| CellValue::Number(if complete { 1.0 } else { 0.0 }))
            .collect(),
    ));

    if report.unparseable_dates > 0 {
        warn!(
            cells = report.unparseable_dates,
            "'{}' values that are not dates were cleared", ADDED
        );
    }
    info!(
        sheet = %raw.sheet,
        rows = raw.row_count,
        columns = columns.len(),
        dropped = report.dropped.len(),
        incomplete = report.incomplete_rows,
        "normalized sheet"
    );

    let table = NormalizedTable::new(columns, raw.row_count)?;
    Ok((table, report))
}

/// True when every required cell holds non-blank text
pub fn is_complete(cells: &[&CellValue]) -> bool {
    cells.iter().all(|cell| !cell.as_text().trim().is_empty())
}

fn drop_where<F>(
    columns: &mut Vec<Column>,
    report: &mut NormalizationReport,
    reason: DropReason,
    predicate: F,
) where
    F: Fn(&Column) -> bool,
{
    columns.retain(|column| {
        if predicate(column) {
            debug!(column = %column.name, reason = reason.describe(), "dropping column");
            report.dropped.push(DroppedColumn {
                name: column.name.clone(),
                reason,
            });
            false
        } else {
            true
        }
    });
}

/// Rewrite every cell as `DD/MM/YYYY` text; returns how many were cleared
fn reformat_dates(column: &mut Column) -> usize {
    let mut cleared = 0;
    for cell in column.cells.iter_mut() {
        *cell = match coerce_date(cell) {
            Some(dt) => CellValue::Text(format_day_first(&dt)),
            None => {
                if !cell.is_empty() {
                    cleared += 1;
                }
                CellValue::Empty
            }
        };
    }
    cleared
}

fn complete_status(columns: &[Column], row_count: usize) -> PimResult<Vec<bool>> {
    let required = REQUIRED_COLUMNS
        .iter()
        .map(|name| {
            columns
                .iter()
                .find(|c| c.name == *name)
                .ok_or_else(|| PimError::MissingRequiredColumn(name.to_string()))
        })
        .collect::<PimResult<Vec<&Column>>>()?;

    Ok((0..row_count)
        .map(|row| {
            let cells: Vec<&CellValue> = required.iter().map(|c| &c.cells[row]).collect();
            is_complete(&cells)
        })
        .collect())
}
