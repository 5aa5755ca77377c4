//! PIM Grid server implementation
//!
//! HTTP server using Axum. Hosts the grid page and the JSON endpoints it
//! reads from.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::core::SheetCache;
use crate::grid::DEFAULT_TITLE;
use crate::logging::init_tracing;
use crate::types::LoadOptions;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub source: LoadOptions,
    pub title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            source: LoadOptions::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub source: LoadOptions,
    pub title: String,
    pub cache: SheetCache,
}

impl AppState {
    pub fn new(source: LoadOptions, title: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            source,
            title: title.into(),
            cache: SheetCache::new(),
        }
    }
}

/// Routes and middleware, without binding a socket
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/api/v1/table", get(handlers::table))
        .route("/api/v1/grid", get(handlers::grid))
        .route("/api/v1/reload", post(handlers::reload))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    init_tracing("pim_grid=info,tower_http=info");

    let state = Arc::new(AppState::new(config.source.clone(), config.title.clone()));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("PIM Grid server starting on http://{}", addr);
    info!(
        "   Sheet: {} [{}] ({})",
        config.source.path.display(),
        config.source.sheet,
        config.source.columns
    );
    info!("   Endpoints: /, /api/v1/table, /api/v1/grid, /api/v1/reload");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PIM Grid server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn missing_source_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            LoadOptions::new("/nonexistent/pim.xlsx", "PIM"),
            "PIM Lite",
        ))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.source.sheet, "PIM");
        assert_eq!(config.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse().unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_version() {
        let state = missing_source_state();
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, body) = get(router(missing_source_state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("healthy"));
    }

    #[tokio::test]
    async fn test_root_missing_file_renders_no_grid() {
        let (status, body) = get(router(missing_source_state()), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("File not found"));
        assert!(!body.contains("agGrid"));
    }

    #[tokio::test]
    async fn test_grid_missing_file_is_error_response() {
        let (status, body) = get(router(missing_source_state()), "/api/v1/grid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }
}
