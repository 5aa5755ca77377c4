use clap::{Parser, Subcommand};
use colored::Colorize;
use pim_grid::cli::{self, SourceArgs};
use pim_grid::grid::DEFAULT_TITLE;
use pim_grid::logging::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pim-grid")]
#[command(about = "Inspect and serve a PIM Lite sheet as a cleaned, editable grid.")]
#[command(long_about = "PIM Grid - triage view over a PIM Lite workbook

Loads one sheet (default: PIM, columns A:U, headers on row 2), drops
placeholder/separator/empty columns, reformats 'Added' as DD/MM/YYYY and
appends a 'Complete Status' flag over the four classification columns.

COMMANDS:
  inspect  - Summarize columns, incomplete rows and over-count rows
  grid     - Print the grid payload (column config + rows) as JSON
  watch    - Reload and summarize whenever the workbook changes

Run 'pim-grid-server' to open the grid in a browser.

EXAMPLES:
  pim-grid inspect -f products.xlsx
  pim-grid inspect --verbose             # also list dropped columns
  pim-grid grid -o grid.json
  pim-grid watch -f products.xlsx")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Log pipeline decisions (dropped columns, cache activity)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the normalized sheet
    Inspect,

    /// Print or write the grid payload as JSON
    Grid {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page title carried in the payload
        #[arg(short, long, default_value = DEFAULT_TITLE)]
        title: String,
    },

    /// Reload the sheet whenever the workbook changes
    Watch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "pim_grid=debug" } else { "pim_grid=warn" });

    let options = cli.source.load_options();
    let result = match cli.command {
        Commands::Inspect => cli::inspect(&options, cli.verbose),
        Commands::Grid { output, title } => cli::grid(&options, &title, output),
        Commands::Watch => cli::watch(&options, cli.verbose),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
