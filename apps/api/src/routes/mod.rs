pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

/// Uploads and resume payloads larger than this are rejected.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .route("/api/v1/validate", post(handlers::handle_validate))
        .route("/api/v1/render/pdf", post(handlers::handle_render_pdf))
        .route("/api/v1/render/docx", post(handlers::handle_render_docx))
        .route("/api/v1/qa", post(handlers::handle_qa))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
