use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub file_name: String,
    pub format: String,
}

/// POST /api/v1/export
///
/// Returns the rendered bytes as a download. Rendering runs on the blocking
/// pool since PDF layout of a long document is CPU-bound.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let config = state.export_config.clone();

    let document = tokio::task::spawn_blocking(move || {
        render(&req.text, &req.file_name, &req.format, &config)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    tracing::info!(
        extension = document.extension,
        bytes = document.bytes.len(),
        file_name = %document.file_name,
        "Export rendered"
    );

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, document.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
