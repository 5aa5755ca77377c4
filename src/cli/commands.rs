use crate::core::{is_complete, LoadedSheet, SheetCache, REQUIRED_COLUMNS};
use crate::error::{PimError, PimResult};
use crate::grid::{coerce_float, find_count_column, GridPayload};
use crate::types::{ColumnSpan, LoadOptions, DEFAULT_FILE, DEFAULT_HEADER_ROW, DEFAULT_SHEET};
use clap::Args;
use colored::Colorize;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Duration;

/// Where the sheet comes from; shared by the CLI and the server
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Spreadsheet file to load
    #[arg(short, long, default_value = DEFAULT_FILE, global = true)]
    pub file: PathBuf,

    /// Sheet name inside the workbook
    #[arg(short, long, default_value = DEFAULT_SHEET, global = true)]
    pub sheet: String,

    /// Column span to read, e.g. A:U
    #[arg(long, default_value = "A:U", global = true)]
    pub columns: ColumnSpan,

    /// Zero-based row holding the headers (rows above it are skipped)
    #[arg(long, default_value_t = DEFAULT_HEADER_ROW, global = true)]
    pub header_row: usize,
}

impl SourceArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            path: self.file.clone(),
            sheet: self.sheet.clone(),
            columns: self.columns,
            header_row: self.header_row,
        }
    }
}

/// A row whose completeness flag is 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteRow {
    /// 1-based row number as shown by spreadsheet software
    pub sheet_row: usize,
    pub missing: Vec<String>,
}

/// Human-oriented digest of a loaded sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectSummary {
    pub columns: Vec<String>,
    pub rows: usize,
    pub incomplete: Vec<IncompleteRow>,
    /// Sheet rows whose count value exceeds 1
    pub over_count: Vec<usize>,
}

pub fn summarize(loaded: &LoadedSheet, options: &LoadOptions) -> InspectSummary {
    let table = &loaded.table;
    // header row index + 1 for 1-based numbering + 1 for the first data row
    let sheet_row = |index: usize| options.header_row + 2 + index;

    let required: Vec<_> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| table.column(name))
        .collect();
    let incomplete = (0..table.row_count())
        .filter_map(|row| {
            let cells: Vec<_> = required.iter().map(|c| &c.cells[row]).collect();
            if is_complete(&cells) {
                return None;
            }
            let missing = required
                .iter()
                .filter(|c| c.cells[row].is_blank())
                .map(|c| c.name.clone())
                .collect();
            Some(IncompleteRow {
                sheet_row: sheet_row(row),
                missing,
            })
        })
        .collect();

    let over_count = find_count_column(table)
        .and_then(|name| table.column(name))
        .map(|column| {
            column
                .cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| coerce_float(cell).is_some_and(|n| n > 1.0))
                .map(|(row, _)| sheet_row(row))
                .collect()
        })
        .unwrap_or_default();

    InspectSummary {
        columns: table.column_names().iter().map(|s| s.to_string()).collect(),
        rows: table.row_count(),
        incomplete,
        over_count,
    }
}

/// Execute the inspect command
pub fn inspect(options: &LoadOptions, verbose: bool) -> PimResult<()> {
    println!("{}", "🔎 PIM Grid - Inspect".bold().green());
    println!("   File:  {}", options.path.display());
    println!("   Sheet: {} ({})\n", options.sheet, options.columns);

    let loaded = LoadedSheet::load(options)?;
    print_summary(&loaded, options, verbose);
    Ok(())
}

fn print_summary(loaded: &LoadedSheet, options: &LoadOptions, verbose: bool) {
    let summary = summarize(loaded, options);

    println!(
        "{} {} columns, {} rows",
        "📊".cyan(),
        summary.columns.len(),
        summary.rows
    );
    for name in &summary.columns {
        println!("      {}", name.cyan());
    }

    if verbose && !loaded.report.dropped.is_empty() {
        println!("\n   {}", "Dropped columns:".bold());
        for dropped in &loaded.report.dropped {
            let name = if dropped.name.is_empty() {
                "<blank>".to_string()
            } else {
                dropped.name.clone()
            };
            println!("      {} ({})", name.yellow(), dropped.reason.describe());
        }
    }
    if loaded.report.unparseable_dates > 0 {
        println!(
            "\n   {} {} 'Added' values were not dates and were cleared",
            "⚠️".yellow(),
            loaded.report.unparseable_dates
        );
    }

    println!();
    if summary.incomplete.is_empty() {
        println!("{}", "✅ All rows complete".bold().green());
    } else {
        println!(
            "{} {} incomplete rows",
            "❌".red(),
            summary.incomplete.len().to_string().bold().red()
        );
        for row in &summary.incomplete {
            println!(
                "      Row {}: missing {}",
                row.sheet_row,
                row.missing.join(", ").yellow()
            );
        }
    }
    if !summary.over_count.is_empty() {
        let rows: Vec<String> = summary.over_count.iter().map(|r| r.to_string()).collect();
        println!(
            "{} Count above 1 on rows {}",
            "⚠️".yellow(),
            rows.join(", ").yellow()
        );
    }
}

/// Execute the grid command: emit the grid payload as JSON
pub fn grid(options: &LoadOptions, title: &str, output: Option<PathBuf>) -> PimResult<()> {
    let loaded = LoadedSheet::load(options)?;
    let payload = GridPayload::build(&loaded.table, title);
    let json = serde_json::to_string_pretty(&payload)?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("{}", "✅ Grid payload written".bold().green());
            println!(
                "   {} columns, {} rows → {}",
                payload.grid_options.column_defs.len(),
                payload.row_data.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Execute the watch command
pub fn watch(options: &LoadOptions, verbose: bool) -> PimResult<()> {
    println!("{}", "👁️  PIM Grid - Watch Mode".bold().green());
    println!("   Watching: {}", options.path.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !options.path.exists() {
        return Err(PimError::MissingFile(options.path.clone()));
    }

    let canonical_path = options.path.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| PimError::Watch("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(300), tx)
        .map_err(|e| PimError::Watch(format!("Failed to create file watcher: {}", e)))?;
    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| PimError::Watch(format!("Failed to watch directory: {}", e)))?;

    let cache = SheetCache::new();
    println!("{}", "🔄 Initial load...".cyan());
    run_watch_action(&cache, options, verbose);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name() == canonical_path.file_name()
                });
                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    cache.invalidate(options);
                    run_watch_action(&cache, options, verbose);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn run_watch_action(cache: &SheetCache, options: &LoadOptions, verbose: bool) {
    match cache.load(options) {
        Ok(loaded) => print_summary(&loaded, options, verbose),
        Err(e) => println!("{} {}", "❌ Load failed:".bold().red(), e),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
