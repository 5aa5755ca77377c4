//! Spreadsheet import
//!
//! Reads one named sheet of an xlsx/xlsm/xlsb/xls/ods workbook into a
//! [`RawTable`](crate::types::RawTable): a fixed column span, headers on a
//! fixed row, cells mapped onto the closed cell model.

mod reader;

pub use reader::{read_range, SheetReader};
