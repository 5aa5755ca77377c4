//! JSON handed to the grid widget: configuration plus row data

use super::config::{bind, GridOptions, RenderOptions};
use crate::types::{CellValue, NormalizedTable};
use serde::Serialize;
use serde_json::{Map, Value};

/// One row keyed by column name
pub type RowRecord = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPayload {
    pub title: String,
    pub grid_options: GridOptions,
    pub render_options: RenderOptions,
    pub row_data: Vec<RowRecord>,
}

impl GridPayload {
    /// Bind `table` and attach its rows
    pub fn build(table: &NormalizedTable, title: impl Into<String>) -> Self {
        let config = bind(table);
        Self {
            title: title.into(),
            grid_options: config.grid_options,
            render_options: config.render_options,
            row_data: row_records(table),
        }
    }
}

/// Rows as JSON objects; empty cells become `null`
pub fn row_records(table: &NormalizedTable) -> Vec<RowRecord> {
    let names = table.column_names();
    table
        .rows()
        .map(|row| {
            names
                .iter()
                .zip(row)
                .map(|(name, cell)| (name.to_string(), cell_json(cell)))
                .collect()
        })
        .collect()
}

/// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integral numbers become JSON integers (`1`, not `1.0`)
fn cell_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
            Value::from(*n as i64)
        }
        _ => serde_json::to_value(cell).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{normalize, COMPLETE_STATUS};
    use crate::types::RawTable;

    fn table() -> NormalizedTable {
        let raw = RawTable::from_rows(
            "PIM",
            &["Name", "Macro Material_", "Main Color_", "Shape_", "Carry_"],
            vec![vec![
                CellValue::Text("Bag".into()),
                CellValue::Text("Leather".into()),
                CellValue::Empty,
                CellValue::Text("Round".into()),
                CellValue::Text("Hand".into()),
            ]],
        )
        .unwrap();
        normalize(&raw).unwrap().0
    }

    #[test]
    fn test_row_records() {
        let records = row_records(&table());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Name"], "Bag");
        assert_eq!(records[0]["Main Color_"], Value::Null);
        assert_eq!(records[0][COMPLETE_STATUS], 0);
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(cell_json(&CellValue::Number(1.0)).to_string(), "1");
        assert_eq!(cell_json(&CellValue::Number(-3.0)).to_string(), "-3");
        assert_eq!(cell_json(&CellValue::Number(2.5)).to_string(), "2.5");
        assert_eq!(cell_json(&CellValue::Empty), Value::Null);

        let json = serde_json::to_string(&row_records(&table())).unwrap();
        assert!(json.contains(r#""Complete Status":0"#));
        assert!(!json.contains("0.0"));
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = GridPayload::build(&table(), "PIM Lite");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "PIM Lite");
        assert_eq!(json["gridOptions"]["rowHeight"], 60);
        assert_eq!(json["gridOptions"]["defaultColDef"]["wrapText"], true);
        assert_eq!(json["renderOptions"]["theme"], "alpine");
        assert_eq!(json["rowData"].as_array().unwrap().len(), 1);
        let shape = &json["gridOptions"]["columnDefs"][3];
        assert_eq!(shape["field"], "Shape_");
        assert_eq!(shape["cellEditor"]["type"], "select");
        assert_eq!(shape["cellEditor"]["values"][0], "Round");
    }
}
