//! Grid configuration and the binder that derives it from a table

use super::style::{StyleDescriptor, StyleRule, FONT_SIZE, LINE_HEIGHT};
use crate::core::{COMPLETE_STATUS, REQUIRED_COLUMNS};
use crate::types::{CellValue, Column, NormalizedTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Tinted columns; the same attributes the completeness flag checks
pub const HIGHLIGHT_COLUMNS: [&str; 4] = REQUIRED_COLUMNS;
pub const WIDE_COLUMNS: [&str; 4] = ["Name", "Brand", "Category", "Main Color_"];
pub const DROPDOWN_COLUMNS: [&str; 5] = [
    "Macro Material_",
    "Main Material_",
    "Main Color_",
    "Shape_",
    "Carry_",
];
pub const IMAGE_URL: &str = "Image URL";
pub const URL: &str = "URL";

pub const ROW_HEIGHT: u32 = 60;
pub const IMAGE_HEIGHT: u32 = 60;
pub const VIEWPORT_HEIGHT: u32 = 900;
pub const THEME: &str = "alpine";
pub const DEFAULT_TITLE: &str = "250408 PIM Lite Consolidated";

/// Settings shared by every column unless a column overrides them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultColumnDef {
    pub resizable: bool,
    pub filter: bool,
    pub sortable: bool,
    pub editable: bool,
    pub wrap_text: bool,
    pub auto_height: bool,
    pub cell_style: StyleDescriptor,
}

impl Default for DefaultColumnDef {
    fn default() -> Self {
        Self {
            resizable: true,
            filter: true,
            sortable: true,
            editable: true,
            wrap_text: true,
            auto_height: false,
            cell_style: StyleDescriptor::compact(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellEditor {
    Text,
    Select { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellRenderer {
    /// Cell value is an image address
    Image { height: u32 },
}

/// How a user edits a column, once defaults and overrides are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind<'a> {
    Text,
    Select(&'a [String]),
    ReadOnly,
}

/// Per-column overrides; `None` falls back to [`DefaultColumnDef`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_height: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_editor: Option<CellEditor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_renderer: Option<CellRenderer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_style: Option<StyleRule>,
}

impl ColumnDef {
    pub fn new(name: &str) -> Self {
        Self {
            field: name.to_string(),
            header_name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn editor_kind<'a>(&'a self, defaults: &DefaultColumnDef) -> EditorKind<'a> {
        if !self.editable.unwrap_or(defaults.editable) {
            return EditorKind::ReadOnly;
        }
        match &self.cell_editor {
            Some(CellEditor::Select { values }) => EditorKind::Select(values),
            Some(CellEditor::Text) | None => EditorKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub default_col_def: DefaultColumnDef,
    pub column_defs: Vec<ColumnDef>,
    pub row_height: u32,
    /// Headers such as `Name.1` are plain field names, not nested paths
    pub suppress_field_dot_notation: bool,
}

/// Options for the page hosting the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub height: u32,
    pub theme: String,
    pub fit_columns_on_grid_load: bool,
    /// CSS selector → declarations
    pub custom_css: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let header = BTreeMap::from([
            ("font-size".to_string(), FONT_SIZE.to_string()),
            ("line-height".to_string(), LINE_HEIGHT.to_string()),
            ("white-space".to_string(), "normal".to_string()),
        ]);
        Self {
            height: VIEWPORT_HEIGHT,
            theme: THEME.to_string(),
            fit_columns_on_grid_load: true,
            custom_css: BTreeMap::from([(".ag-header-cell-label".to_string(), header)]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub grid_options: GridOptions,
    pub render_options: RenderOptions,
}

impl GridConfig {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.grid_options
            .column_defs
            .iter()
            .find(|def| def.field == name)
    }

    pub fn editor_kind(&self, name: &str) -> Option<EditorKind<'_>> {
        self.column(name)
            .map(|def| def.editor_kind(&self.grid_options.default_col_def))
    }

    /// Style of one cell: the column's rule, or the default cell style
    pub fn style_for(&self, column: &str, value: &CellValue) -> StyleDescriptor {
        match self.column(column).and_then(|def| def.cell_style.as_ref()) {
            Some(rule) => rule.style_for(value),
            None => self.grid_options.default_col_def.cell_style.clone(),
        }
    }
}

/// Accumulates column settings; later calls override earlier ones
pub struct GridConfigBuilder {
    default_col_def: DefaultColumnDef,
    column_defs: Vec<ColumnDef>,
    row_height: u32,
}

impl GridConfigBuilder {
    /// One column definition per table column, in table order
    pub fn from_table(table: &NormalizedTable) -> Self {
        Self {
            default_col_def: DefaultColumnDef::default(),
            column_defs: table.column_names().into_iter().map(ColumnDef::new).collect(),
            row_height: ROW_HEIGHT,
        }
    }

    pub fn configure_default_column(&mut self, configure: impl FnOnce(&mut DefaultColumnDef)) {
        configure(&mut self.default_col_def);
    }

    /// Apply `configure` to the named column; no-op when absent
    pub fn configure_column(&mut self, name: &str, configure: impl FnOnce(&mut ColumnDef)) -> bool {
        match self.column_defs.iter_mut().find(|def| def.field == name) {
            Some(def) => {
                configure(def);
                true
            }
            None => false,
        }
    }

    pub fn row_height(&mut self, height: u32) {
        self.row_height = height;
    }

    pub fn build(self) -> GridConfig {
        GridConfig {
            grid_options: GridOptions {
                default_col_def: self.default_col_def,
                column_defs: self.column_defs,
                row_height: self.row_height,
                suppress_field_dot_notation: true,
            },
            render_options: RenderOptions::default(),
        }
    }
}

/// Derive the grid configuration for a normalized table
pub fn bind(table: &NormalizedTable) -> GridConfig {
    let mut builder = GridConfigBuilder::from_table(table);

    for name in HIGHLIGHT_COLUMNS {
        builder.configure_column(name, |def| {
            def.cell_style = Some(StyleRule::highlight());
            def.min_width = Some(90);
        });
    }

    builder.configure_column(IMAGE_URL, |def| {
        def.cell_renderer = Some(CellRenderer::Image {
            height: IMAGE_HEIGHT,
        });
        def.editable = Some(false);
        def.width = Some(230);
    });

    builder.configure_column(URL, |def| {
        def.editable = Some(true);
        def.cell_editor = Some(CellEditor::Text);
        def.width = Some(250);
    });

    if let Some(count) = find_count_column(table) {
        builder.configure_column(count, |def| {
            def.cell_style = Some(StyleRule::alarm_above(1.0));
        });
    }

    builder.configure_column(COMPLETE_STATUS, |def| {
        def.cell_style = Some(StyleRule::alarm_on(0));
        def.width = Some(120);
    });

    for name in WIDE_COLUMNS {
        builder.configure_column(name, |def| {
            def.wrap_text = Some(true);
            def.auto_height = Some(false);
            def.min_width = Some(120);
        });
    }

    for name in DROPDOWN_COLUMNS {
        let Some(column) = table.column(name) else {
            continue;
        };
        let values = dropdown_values(column);
        builder.configure_column(name, |def| {
            def.editable = Some(true);
            def.cell_editor = Some(CellEditor::Select { values });
            def.wrap_text = Some(true);
            def.auto_height = Some(false);
            def.min_width = Some(100);
        });
    }

    builder.build()
}

/// First column named `count`, ignoring case and surrounding whitespace
pub fn find_count_column(table: &NormalizedTable) -> Option<&str> {
    table
        .column_names()
        .into_iter()
        .find(|name| name.trim().to_lowercase() == "count")
}

/// Distinct non-empty trimmed values of a column, in first-seen order
pub fn dropdown_values(column: &Column) -> Vec<String> {
    let mut seen = HashSet::new();
    column
        .cells
        .iter()
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|value| !value.is_empty() && seen.insert(value.clone()))
        .collect()
}
