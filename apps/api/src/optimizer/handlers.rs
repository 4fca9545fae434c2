//! Axum route handlers for the optimizer API.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::TextStream;
use crate::optimizer::analysis::{analyze_resume, job_insights, skills_gap};
use crate::optimizer::models::{
    AtsAnalysis, CoverLetterTone, EmailType, GeneratedEmail, JobInsights, SkillsGap,
};
use crate::optimizer::writing::{cover_letter_stream, generate_email, optimize_resume_stream};
use crate::state::AppState;

const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const RESUME_AND_JD_REQUIRED: &str = "Resume text and job description are required";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

// Missing fields deserialize as empty strings so they fail validation with a
// 400 rather than a JSON rejection.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeJobRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub email_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsightsRequest {
    #[serde(default)]
    pub job_description: String,
}

fn require_resume_and_jd(resume_text: &str, job_description: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() || job_description.trim().is_empty() {
        return Err(AppError::Validation(RESUME_AND_JD_REQUIRED.to_string()));
    }
    Ok(())
}

/// Relays a completion stream as a chunked `text/plain` body.
fn text_stream_response(stream: TextStream, feature: &'static str) -> Response {
    let body = Body::from_stream(stream.inspect_err(move |e| {
        tracing::error!(feature, error = %e, "Completion stream failed mid-response");
    }));
    ([(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)], body).into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<ResumeJobRequest>,
) -> Result<Json<AtsAnalysis>, AppError> {
    require_resume_and_jd(&req.resume_text, &req.job_description)?;
    let analysis = analyze_resume(state.llm.as_ref(), &req.resume_text, &req.job_description).await?;
    tracing::info!(score = analysis.score, "ATS analysis complete");
    Ok(Json(analysis))
}

/// POST /api/v1/optimize
///
/// Streams the rewritten résumé as plain text.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Response, AppError> {
    require_resume_and_jd(&req.resume_text, &req.job_description)?;
    let stream = optimize_resume_stream(
        state.llm.as_ref(),
        &req.resume_text,
        &req.job_description,
        &req.missing_keywords,
    )
    .await?;
    Ok(text_stream_response(stream, "optimize"))
}

/// POST /api/v1/cover-letter
///
/// Streams a cover letter. Unknown tones fall back to professional.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Response, AppError> {
    require_resume_and_jd(&req.resume_text, &req.job_description)?;
    let tone = CoverLetterTone::parse_or_default(req.tone.as_deref());
    let stream =
        cover_letter_stream(state.llm.as_ref(), &req.resume_text, &req.job_description, tone)
            .await?;
    Ok(text_stream_response(stream, "cover-letter"))
}

/// POST /api/v1/emails/generate
pub async fn handle_generate_email(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<GeneratedEmail>, AppError> {
    if req.resume_text.trim().is_empty()
        || req.job_description.trim().is_empty()
        || req.email_type.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Resume text, job description, and email type are required".to_string(),
        ));
    }
    let email_type = EmailType::parse(&req.email_type).ok_or_else(|| {
        AppError::Validation(
            "Invalid email type. Must be 'application', 'follow-up', or 'thank-you'".to_string(),
        )
    })?;

    let email =
        generate_email(state.llm.as_ref(), &req.resume_text, &req.job_description, email_type)
            .await?;
    Ok(Json(email))
}

/// POST /api/v1/job-insights
pub async fn handle_job_insights(
    State(state): State<AppState>,
    Json(req): Json<JobInsightsRequest>,
) -> Result<Json<JobInsights>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("Job description is required".to_string()));
    }
    Ok(Json(job_insights(state.llm.as_ref(), &req.job_description).await?))
}

/// POST /api/v1/skills/analyze
pub async fn handle_skills_analyze(
    State(state): State<AppState>,
    Json(req): Json<ResumeJobRequest>,
) -> Result<Json<SkillsGap>, AppError> {
    require_resume_and_jd(&req.resume_text, &req.job_description)?;
    let gap = skills_gap(state.llm.as_ref(), &req.resume_text, &req.job_description).await?;
    tracing::info!(match_percentage = gap.match_percentage, "Skills gap analysis complete");
    Ok(Json(gap))
}
