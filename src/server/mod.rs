pub mod handlers;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Uploads are whole spreadsheets.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub type SharedState = Arc<AppState>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))
        .route("/translate", post(handlers::translate))
        .route("/to-json", post(handlers::to_json))
        .route("/progress", get(handlers::progress))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(Arc::new(state))
}

pub async fn run_http_server(state: AppState, bind_addr: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("HTTP server listening on http://{}", addr);
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  GET  /info       - Server info");
    tracing::info!("  POST /translate  - Translate headers of an uploaded CSV/Excel file");
    tracing::info!("  POST /to-json    - Convert an uploaded CSV file to JSON");
    tracing::info!("  GET  /progress   - Latest progress of the running translation");
    tracing::info!(
        "Example: curl --data-binary @data.xlsx 'http://{}/translate?filename=data.xlsx' -o out.xlsx",
        addr
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
