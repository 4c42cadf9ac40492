pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/candidates/:slot/resume",
            put(handlers::handle_upload_resume).delete(handlers::handle_remove_resume),
        )
        .route(
            "/api/v1/sessions/:id/candidates/:slot/links",
            put(handlers::handle_update_links),
        )
        .route("/api/v1/sessions/:id/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
