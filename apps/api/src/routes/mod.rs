pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::diff::handlers as diff;
use crate::export::handlers as export;
use crate::ingest::handlers as ingest;
use crate::optimizer::handlers as optimizer;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Core: comparison and export
        .route("/api/v1/compare", post(diff::handle_compare))
        .route("/api/v1/export", post(export::handle_export))
        // Intake
        .route(
            "/api/v1/extract",
            post(ingest::handle_extract).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/job-url/check", get(ingest::handle_check_job_url))
        // Model-backed features
        .route("/api/v1/analyze", post(optimizer::handle_analyze))
        .route("/api/v1/optimize", post(optimizer::handle_optimize))
        .route("/api/v1/cover-letter", post(optimizer::handle_cover_letter))
        .route(
            "/api/v1/emails/generate",
            post(optimizer::handle_generate_email),
        )
        .route("/api/v1/job-insights", post(optimizer::handle_job_insights))
        .route(
            "/api/v1/skills/analyze",
            post(optimizer::handle_skills_analyze),
        )
        .with_state(state)
}
