//! PIM Grid server binary
//!
//! Hosts the editable grid page over one PIM sheet.

use clap::Parser;
use pim_grid::api::{run_api_server, ApiConfig};
use pim_grid::cli::SourceArgs;
use pim_grid::grid::DEFAULT_TITLE;

#[derive(Parser, Debug)]
#[command(name = "pim-grid-server")]
#[command(version)]
#[command(about = "PIM Grid server - editable, conditionally styled grid over a PIM sheet")]
#[command(long_about = r#"
PIM Grid server

Loads one sheet of a PIM Lite workbook, cleans it, and serves it as an
interactive grid. Edits made in the browser are not saved.

Endpoints:
  - GET  /                 - Grid page (error page if the sheet cannot be loaded)
  - GET  /api/v1/table     - Normalized columns and rows
  - GET  /api/v1/grid      - Grid configuration plus rows
  - POST /api/v1/reload    - Re-read the workbook on the next request
  - GET  /health           - Health check
  - GET  /version          - Server version info

Example usage:
  pim-grid-server -f "250408_PIM Lite Consolidated.xlsx"
  pim-grid-server --host 0.0.0.0 --port 3000
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PIM_GRID_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PIM_GRID_PORT")]
    port: u16,

    /// Page title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        source: args.source.load_options(),
        title: args.title,
    };

    run_api_server(config).await
}
