//! API request handlers
//!
//! Handlers for the grid page and the JSON endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::DroppedColumn;
use crate::error::PimError;
use crate::grid::{row_records, GridPayload, RowRecord};

use super::page;
use super::server::AppState;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a failed load
pub fn error_status(error: &PimError) -> StatusCode {
    match error {
        PimError::MissingFile(_) | PimError::MissingSheet { .. } => StatusCode::NOT_FOUND,
        PimError::MissingRequiredColumn(_)
        | PimError::Parse(_)
        | PimError::InvalidColumnSpan(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PimError::Io(_) | PimError::Json(_) | PimError::Watch(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn failure<T: Serialize>(error: PimError) -> (StatusCode, Json<ApiResponse<T>>) {
    warn!(error = %error, "sheet load failed");
    (error_status(&error), Json(ApiResponse::err(error.to_string())))
}

/// GET / - Grid page, or an error page when the sheet cannot be loaded
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.cache.load(&state.source) {
        Ok(_) => (StatusCode::OK, Html(page::grid_page(&state.title))),
        Err(e) => {
            warn!(error = %e, "not rendering grid");
            (
                error_status(&e),
                Html(page::error_page(&state.title, &e.to_string())),
            )
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "table".to_string(),
            "grid".to_string(),
            "reload".to_string(),
        ],
    }))
}

/// Normalized table response
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub sheet: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub rows: Vec<RowRecord>,
    pub dropped: Vec<DroppedColumn>,
    pub unparseable_dates: usize,
    pub incomplete_rows: usize,
}

/// GET /api/v1/table - Normalized columns and rows
pub async fn table(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.cache.load(&state.source) {
        Ok(loaded) => (
            StatusCode::OK,
            Json(ApiResponse::ok(TableResponse {
                sheet: loaded.raw.sheet.clone(),
                columns: loaded
                    .table
                    .column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                row_count: loaded.table.row_count(),
                rows: row_records(&loaded.table),
                dropped: loaded.report.dropped.clone(),
                unparseable_dates: loaded.report.unparseable_dates,
                incomplete_rows: loaded.report.incomplete_rows,
            })),
        ),
        Err(e) => failure(e),
    }
}

/// GET /api/v1/grid - Grid configuration plus row data
pub async fn grid(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.cache.load(&state.source) {
        Ok(loaded) => (
            StatusCode::OK,
            Json(ApiResponse::ok(GridPayload::build(&loaded.table, &state.title))),
        ),
        Err(e) => failure(e),
    }
}

/// Reload response
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub invalidated: bool,
    pub file_path: String,
    pub sheet: String,
}

/// POST /api/v1/reload - Drop the cached parse; the next request re-reads the file
pub async fn reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let invalidated = state.cache.invalidate(&state.source);
    info!(invalidated, path = %state.source.path.display(), "reload requested");
    Json(ApiResponse::ok(ReloadResponse {
        invalidated,
        file_path: state.source.path.display().to_string(),
        sheet: state.source.sheet.clone(),
    }))
}
