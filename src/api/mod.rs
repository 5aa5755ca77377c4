//! PIM Grid HTTP server module
//!
//! Serves the grid page and its JSON feed.
//! Run with `pim-grid-server`.

pub mod handlers;
pub mod page;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
