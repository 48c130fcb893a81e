//! Axum router configuration with middleware.
//!
//! The chat page is served at `/`; JSON routes live under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/examples", get(handlers::chat::list_examples))
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/sessions/{id}/loading-shown",
            post(handlers::session::mark_loading_shown),
        )
        .route("/sessions/{id}/prefill", post(handlers::session::prefill))
        .route("/sessions/{id}/messages", post(handlers::chat::send_message));

    Router::new()
        .route("/", get(handlers::page::index))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
