use std::path::PathBuf;
use thiserror::Error;

pub type PimResult<T> = Result<T, PimError>;

#[derive(Error, Debug)]
pub enum PimError {
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Required column '{0}' is missing from the sheet")]
    MissingRequiredColumn(String),

    #[error("Invalid column span: {0}")]
    InvalidColumnSpan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(String),
}
