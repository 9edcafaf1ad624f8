//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Roster review view
        .route("/roster", get(handlers::get_roster))
        .route("/roster/edits", post(handlers::apply_edit))
        .route("/roster/entries", post(handlers::upsert_entry))
        .route("/roster/sync", post(handlers::sync_roster))
        // Upload reconciliation
        .route("/uploads", post(handlers::ingest_upload))
        .route("/uploads/{digest}", get(handlers::get_reconciliation))
        .route("/uploads/{digest}/approvals", post(handlers::append_approvals))
        .route("/uploads/{digest}/export", post(handlers::export_upload))
        // Historical comparison
        .route("/influencers/{identity}/history", get(handlers::get_history));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow large candidate files during uploads.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
