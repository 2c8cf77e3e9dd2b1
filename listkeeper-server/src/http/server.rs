//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing and request timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::routing::{get, get_service};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::state::AppState;

/// Page served at the mount root, looked up in `<static_dir>/<mount>/`
pub const LIST_PAGE: &str = "shopping-list.html";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Prefix the list API is nested under (default: /shopping-list)
    pub mount_path: String,

    /// Directory served for paths no route matches.
    ///
    /// The list page lives in the subdirectory named after the mount path.
    pub static_dir: Option<PathBuf>,

    /// Per-request timeout (default: 30s)
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_permissive: false,
            mount_path: "/shopping-list".to_string(),
            static_dir: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        let port = config.bind_addr.port();
        let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
            .iter()
            .filter_map(|host| HeaderValue::from_str(&format!("http://{}:{}", host, port)).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let list_routes = Router::new()
        .merge(routes::items::router())
        .merge(routes::check::router());

    let mount = config.mount_path.trim_matches('/');
    let mut app = Router::new().merge(routes::health::router());
    app = if mount.is_empty() {
        app.merge(list_routes)
    } else {
        app.nest(&format!("/{}", mount), list_routes)
    };

    if let Some(dir) = &config.static_dir {
        if !mount.is_empty() {
            app = with_list_page(app, dir, mount);
        }
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the list page at the mount root and move the legacy top-level page URL there.
fn with_list_page(app: Router<Arc<AppState>>, dir: &Path, mount: &str) -> Router<Arc<AppState>> {
    let page = ServeFile::new(dir.join(mount).join(LIST_PAGE));
    let target = format!("/{}/{}", mount, LIST_PAGE);

    app.route(&format!("/{}", mount), get_service(page.clone()))
        .route(&format!("/{}/", mount), get_service(page))
        .route(
            &format!("/{}", LIST_PAGE),
            get(move || {
                let target = target.clone();
                async move { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]) }
            }),
        )
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let store = Store::open("data/shopping_list/sqlite.db").await?;
/// let list = ListService::open(&store, &ListName::new("shoppingList")?).await?;
/// run_server(AppState::new(store, list), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServeError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        mount = %config.mount_path,
        "Server listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
