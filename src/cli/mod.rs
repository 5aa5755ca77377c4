//! CLI command handlers

pub mod commands;

pub use commands::{grid, inspect, watch, SourceArgs};
