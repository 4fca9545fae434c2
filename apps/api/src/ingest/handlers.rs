use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ingest::{
    check_job_url, extract_text, format_file_size, validate_upload, FileKind, JobUrlCheck,
};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const GENERIC_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub text: String,
    pub file_name: String,
    /// Media type the file was validated as.
    pub file_type: String,
    pub size: usize,
    pub size_label: String,
}

#[derive(Debug, Deserialize)]
pub struct JobUrlQuery {
    pub url: String,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// The declared media type, or one inferred from the file name when the client
/// sent none or a generic one.
fn resolve_media_type(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim) {
        Some(media_type) if !media_type.is_empty() && media_type != GENERIC_MEDIA_TYPE => {
            media_type.to_string()
        }
        other => FileKind::from_file_name(file_name)
            .map(|kind| kind.media_type().to_string())
            .unwrap_or_else(|| other.unwrap_or(GENERIC_MEDIA_TYPE).to_string()),
    }
}

/// POST /api/v1/extract
///
/// Multipart upload with a single `file` field. Validates size and type, then
/// extracts plain text on the blocking pool.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let media_type = resolve_media_type(field.content_type(), &file_name);
        let data = field.bytes().await.map_err(multipart_error)?;

        let kind = validate_upload(data.len(), &media_type, state.config.max_upload_bytes)?;
        let size = data.len();

        let text = tokio::task::spawn_blocking(move || extract_text(&data, kind))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Text extraction task failed");
                AppError::UnprocessableEntity(format!("Could not extract text from {file_name}"))
            })??;

        tracing::info!(
            file_name = %file_name,
            media_type = %kind.media_type(),
            size,
            chars = text.chars().count(),
            "Extracted resume text"
        );

        return Ok(Json(ExtractResponse {
            text,
            file_name,
            file_type: kind.media_type().to_string(),
            size,
            size_label: format_file_size(size as u64),
        }));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// GET /api/v1/job-url/check?url=
pub async fn handle_check_job_url(
    Query(query): Query<JobUrlQuery>,
) -> Result<Json<JobUrlCheck>, AppError> {
    Ok(Json(check_job_url(&query.url)?))
}
