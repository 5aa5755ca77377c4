//! PIM Grid - triage grid over a PIM Lite workbook
//!
//! Loads one sheet of a spreadsheet, cleans it into a normalized table, and
//! derives the configuration of an editable, conditionally styled grid.
//!
//! # Pipeline
//!
//! - [`excel::SheetReader`] reads a fixed column span with headers on a fixed row
//! - [`core::normalize`] drops placeholder/separator/empty columns, reformats
//!   `Added` dates and appends the `Complete Status` flag
//! - [`grid::bind`] maps the normalized table onto per-column editors and styles
//! - [`core::SheetCache`] memoizes loads per file, sheet and region
//!
//! # Example
//!
//! ```no_run
//! use pim_grid::core::SheetCache;
//! use pim_grid::grid::bind;
//! use pim_grid::types::LoadOptions;
//!
//! let cache = SheetCache::new();
//! let loaded = cache.load(&LoadOptions::new("pim.xlsx", "PIM"))?;
//! let config = bind(&loaded.table);
//!
//! println!("Columns: {}", config.grid_options.column_defs.len());
//! println!("Incomplete rows: {}", loaded.report.incomplete_rows);
//! # Ok::<(), pim_grid::error::PimError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PimError, PimResult};
pub use types::{CellValue, Column, LoadOptions, NormalizedTable, RawTable};
