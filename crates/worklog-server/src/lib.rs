pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use worklog_core::Worklog;

/// All `/api` routes over one shared [`Worklog`], with CORS and request
/// tracing. Integration tests drive this directly.
pub fn build_router(worklog: Arc<Worklog>) -> Router {
    let app_state = state::AppState::new(worklog);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Worklog
        .route("/api/worklog", get(routes::worklog::get_worklog))
        .route("/api/worklog/entries", post(routes::worklog::add_entries))
        .route("/api/worklog/undo", post(routes::worklog::undo))
        // Reports
        .route("/api/reports", post(routes::reports::generate_report))
        .route("/api/report-styles", get(routes::reports::list_styles))
        // Credential
        .route(
            "/api/credential",
            get(routes::credential::get_status)
                .put(routes::credential::save_key)
                .delete(routes::credential::delete_key),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the worklog API server on `0.0.0.0:<port>`.
pub async fn serve(worklog: Arc<Worklog>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(worklog, listener).await
}

/// Run on an already-bound listener, so a caller binding port 0 can learn the
/// assigned port first.
pub async fn serve_on(
    worklog: Arc<Worklog>,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(worklog);

    tracing::info!("worklog API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
