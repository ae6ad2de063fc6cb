//! Router construction for the TogetherLog server.

use std::sync::Arc;

use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Extension, Router,
};
use togetherlog_core::{JournalService, WorkerService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::jwt::{jwt_auth, JwtConfig};

/// Build the full axum router with all routes and middleware.
pub fn build_router(
    journal: Arc<JournalService>,
    workers: Arc<WorkerService>,
    jwt_config: JwtConfig,
) -> Router {
    // Routes that require JWT authentication
    let protected = Router::new()
        .route(
            "/logs",
            get(handlers::logs::list_logs).post(handlers::logs::create_log),
        )
        .route(
            "/logs/:id",
            get(handlers::logs::get_log)
                .patch(handlers::logs::update_log)
                .delete(handlers::logs::delete_log),
        )
        .route(
            "/logs/:id/entries",
            get(handlers::entries::list_entries).post(handlers::entries::create_entry),
        )
        .route(
            "/entries/:id",
            get(handlers::entries::get_entry)
                .patch(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        .route("/tags", get(handlers::tags::list_tags))
        // Workers
        .route(
            "/workers/compute-smart-page",
            post(handlers::workers::compute_smart_page),
        )
        .route(
            "/workers/reverse-geocode",
            post(handlers::workers::reverse_geocode),
        )
        .route(
            "/workers/compute-colors",
            post(handlers::workers::compute_colors),
        )
        .route(
            "/workers/process-photo",
            post(handlers::workers::process_photo),
        )
        .layer(axum_mw::from_fn(jwt_auth))
        .layer(Extension(jwt_config));

    // Public routes (no auth)
    let public = Router::new().route("/health", get(handlers::health::health));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(Extension(journal))
        .layer(Extension(workers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
