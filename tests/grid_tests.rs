//! Grid binding over a loaded workbook

mod common;

use common::*;
use pim_grid::core::{LoadedSheet, COMPLETE_STATUS};
use pim_grid::grid::{
    bind, dropdown_values, CellEditor, CellRenderer, EditorKind, GridPayload, StyleRule,
    DROPDOWN_COLUMNS, HIGHLIGHT_BACKGROUND, IMAGE_URL,
};
use pim_grid::types::{CellValue, LoadOptions};
use tempfile::TempDir;

fn loaded(dir: &TempDir) -> LoadedSheet {
    LoadedSheet::load(&LoadOptions::new(standard_pim(dir), "PIM")).unwrap()
}

#[test]
fn test_count_alarm_only_above_one() {
    let dir = TempDir::new().unwrap();
    let loaded = loaded(&dir);
    let config = bind(&loaded.table);
    let count = &loaded.table.column("Count").unwrap().cells;

    let alarms: Vec<bool> = count
        .iter()
        .map(|cell| config.style_for("Count", cell).is_alarm())
        .collect();

    assert_eq!(alarms, vec![true, false, false]);
}

#[test]
fn test_count_text_read_like_the_page() {
    let dir = TempDir::new().unwrap();
    let config = bind(&loaded(&dir).table);
    let alarm = |value: &str| {
        config
            .style_for("Count", &CellValue::Text(value.to_string()))
            .is_alarm()
    };

    assert!(alarm("2 pcs"));
    assert!(!alarm("inf"));
    assert!(!alarm("1 pc"));
    assert!(!alarm("pcs: 4"));
}

#[test]
fn test_complete_status_alarm_on_zero() {
    let dir = TempDir::new().unwrap();
    let config = bind(&loaded(&dir).table);

    assert!(config
        .style_for(COMPLETE_STATUS, &CellValue::Number(0.0))
        .is_alarm());
    assert!(!config
        .style_for(COMPLETE_STATUS, &CellValue::Number(1.0))
        .is_alarm());
    assert_eq!(
        config.column(COMPLETE_STATUS).unwrap().cell_style,
        Some(StyleRule::alarm_on(0))
    );
}

#[test]
fn test_required_columns_highlighted() {
    let dir = TempDir::new().unwrap();
    let config = bind(&loaded(&dir).table);

    let style = config.style_for("Shape_", &CellValue::Text("Round".into()));

    assert_eq!(style.background_color.as_deref(), Some(HIGHLIGHT_BACKGROUND));
    assert!(!style.is_alarm());
}

#[test]
fn test_dropdowns_offer_column_values() {
    let dir = TempDir::new().unwrap();
    let loaded = loaded(&dir);
    let config = bind(&loaded.table);

    for name in DROPDOWN_COLUMNS {
        let Some(column) = loaded.table.column(name) else {
            assert!(config.column(name).is_none());
            continue;
        };
        let values = dropdown_values(column);
        match config.editor_kind(name) {
            Some(EditorKind::Select(offered)) => assert_eq!(offered, values.as_slice()),
            other => panic!("{} should be a dropdown, got {:?}", name, other),
        }
        for cell in &column.cells {
            let text = cell.as_text().trim().to_string();
            if !text.is_empty() {
                assert!(values.contains(&text), "{} missing {:?}", name, text);
            }
        }
    }

    assert_eq!(
        config.column("Main Color_").unwrap().cell_editor,
        Some(CellEditor::Select {
            values: vec!["Blue".to_string(), "Black".to_string()]
        })
    );
}

#[test]
fn test_image_column_renders_thumbnails() {
    let dir = TempDir::new().unwrap();
    let config = bind(&loaded(&dir).table);
    let image = config.column(IMAGE_URL).unwrap();

    assert_eq!(image.cell_renderer, Some(CellRenderer::Image { height: 60 }));
    assert!(matches!(
        config.editor_kind(IMAGE_URL),
        Some(EditorKind::ReadOnly)
    ));
}

#[test]
fn test_column_defs_follow_table_order() {
    let dir = TempDir::new().unwrap();
    let loaded = loaded(&dir);
    let config = bind(&loaded.table);

    let fields: Vec<&str> = config
        .grid_options
        .column_defs
        .iter()
        .map(|def| def.field.as_str())
        .collect();

    assert_eq!(fields, loaded.table.column_names());
}

#[test]
fn test_payload_rows_match_table() {
    let dir = TempDir::new().unwrap();
    let loaded = loaded(&dir);

    let json = serde_json::to_value(GridPayload::build(&loaded.table, "PIM Lite")).unwrap();
    let rows = json["rowData"].as_array().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Name"], "Bag");
    assert_eq!(rows[0]["Added"], "05/03/2024");
    assert_eq!(rows[0]["Count"], 2.0);
    assert!(rows[0]["Main Color_"].is_null());
    assert_eq!(rows[1][COMPLETE_STATUS], 1);
    assert!(rows[1][COMPLETE_STATUS].is_i64());
    assert!(rows[0]["Count"].is_i64());
    assert_eq!(json["gridOptions"]["suppressFieldDotNotation"], true);
}

#[test]
fn test_headers_differing_in_spaces_keep_their_values() {
    let dir = TempDir::new().unwrap();
    let path = write_pim(
        &dir,
        &["Name", "Name ", "Macro Material_", "Main Color_", "Shape_", "Carry_"],
        &[vec![
            Str("Bag"),
            Str("Tote"),
            Str("Leather"),
            Str("Black"),
            Str("Round"),
            Str("Hand"),
        ]],
    );
    let loaded = LoadedSheet::load(&LoadOptions::new(path, "PIM")).unwrap();

    let json = serde_json::to_value(GridPayload::build(&loaded.table, "PIM Lite")).unwrap();
    let defs = json["gridOptions"]["columnDefs"].as_array().unwrap();
    let row = json["rowData"][0].as_object().unwrap();

    assert_eq!(row.len(), defs.len());
    assert_eq!(row["Name"], "Bag");
    assert_eq!(row["Name.1"], "Tote");
}
