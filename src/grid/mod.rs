//! Presentation binding: NormalizedTable → grid configuration
//!
//! The grid widget itself lives in the browser. This module decides what it
//! is told: per-column editors, conditional cell styles and layout.

mod coerce;
mod config;
mod payload;
mod style;

pub use config::{
    bind, dropdown_values, find_count_column, CellEditor, CellRenderer, ColumnDef,
    DefaultColumnDef, EditorKind, GridConfig, GridConfigBuilder, GridOptions, RenderOptions,
    DEFAULT_TITLE, DROPDOWN_COLUMNS, HIGHLIGHT_COLUMNS, IMAGE_URL, ROW_HEIGHT, URL,
    VIEWPORT_HEIGHT, WIDE_COLUMNS,
};
pub use coerce::{coerce_float, coerce_int};
pub use payload::{row_records, GridPayload, RowRecord};
pub use style::{StyleDescriptor, StyleRule, HIGHLIGHT_BACKGROUND};
