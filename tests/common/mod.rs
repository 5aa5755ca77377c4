//! Workbook fixtures shared by the integration tests

#![allow(dead_code)] // each test crate uses a subset

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One fixture cell; `Blank` writes nothing
#[derive(Clone, Copy, Debug)]
pub enum Cell {
    Str(&'static str),
    Num(f64),
    Date(u16, u8, u8),
    Blank,
}

pub use Cell::{Blank, Date, Num, Str};

pub const BANNER: &str = "250408 PIM Lite Consolidated";

/// Write `rows` (row 0 first) into a single-sheet workbook
pub fn write_sheet(path: &Path, sheet: &str, rows: &[Vec<Cell>]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Str(s) => {
                    worksheet.write_string(r, c, *s)?;
                }
                Num(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d)?;
                    worksheet.write_datetime_with_format(r, c, &date, &date_format)?;
                }
                Blank => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// A PIM sheet: banner row, header row, then data rows
pub fn write_pim(dir: &TempDir, headers: &[&'static str], rows: &[Vec<Cell>]) -> PathBuf {
    let path = dir.path().join("pim.xlsx");
    let mut all = vec![vec![Str(BANNER)]];
    all.push(
        headers
            .iter()
            .map(|h| if h.is_empty() { Blank } else { Str(h) })
            .collect(),
    );
    all.extend(rows.iter().cloned());
    write_sheet(&path, "PIM", &all).expect("fixture workbook");
    path
}

/// The product sheet used across tests
pub fn standard_pim(dir: &TempDir) -> PathBuf {
    write_pim(
        dir,
        &[
            "Name",
            "",
            "Column2",
            "Added",
            "Macro Material_",
            "Main Color_",
            "Shape_",
            "Carry_",
            "Count",
            "Complete?",
            "| Block",
            "2024",
            "Image URL",
        ],
        &[
            vec![
                Str("Bag"),
                Blank,
                Str("x"),
                Date(2024, 3, 5),
                Str("Leather"),
                Blank,
                Str("Round"),
                Str("Hand"),
                Num(2.0),
                Str("yes"),
                Str("-"),
                Num(1.0),
                Str("https://cdn.example.com/bag.png"),
            ],
            vec![
                Str("Tote"),
                Blank,
                Blank,
                Str("N/A"),
                Str("Canvas"),
                Str("Blue"),
                Str("Square"),
                Str("Shoulder"),
                Num(1.0),
                Str("no"),
                Blank,
                Blank,
                Blank,
            ],
            vec![
                Str("Clutch"),
                Blank,
                Blank,
                Str("2024-01-15"),
                Str("Leather"),
                Str(" Black "),
                Str("Square"),
                Str("Hand"),
                Blank,
                Blank,
                Blank,
                Blank,
                Blank,
            ],
        ],
    )
}
