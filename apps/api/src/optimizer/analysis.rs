//! JSON-returning features: ATS scoring, job insights, and skills-gap analysis.
//!
//! A reply that is not valid JSON falls back to a neutral result instead of
//! failing the request; transport and API failures still surface as errors.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, LlmError};

use super::models::{AtsAnalysis, AtsReply, JobInsights, ScoreBand, SkillsGap, SkillsReply};
use super::prompts;

const NEUTRAL_SCORE: u8 = 50;
const UNPARSEABLE_SUGGESTION: &str = "Unable to parse AI response";

/// Runs a JSON completion, substituting `fallback()` when the reply does not parse.
async fn complete_json_or<T, F>(
    llm: &dyn CompletionService,
    request: CompletionRequest,
    feature: &str,
    fallback: F,
) -> Result<T, AppError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match complete_json::<T>(llm, request).await {
        Ok(value) => Ok(value),
        Err(LlmError::Parse(e)) => {
            warn!(feature, error = %e, "Model reply was not valid JSON; using fallback");
            Ok(fallback())
        }
        Err(e) => Err(AppError::Llm(format!("{feature} failed: {e}"))),
    }
}

/// Clamps a model-reported percentage to 0..=100, rounding to the nearest integer.
fn clamp_percentage(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

pub async fn analyze_resume(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
) -> Result<AtsAnalysis, AppError> {
    let request = CompletionRequest::new(
        prompts::ATS_SYSTEM,
        prompts::ats_prompt(resume_text, job_description),
    )
    .temperature(0.3)
    .max_tokens(2000);

    let reply: AtsReply = complete_json_or(llm, request, "ATS analysis", || AtsReply {
        suggestions: vec![UNPARSEABLE_SUGGESTION.to_string()],
        ..Default::default()
    })
    .await?;

    let score = reply.score.map_or(NEUTRAL_SCORE, clamp_percentage);
    Ok(AtsAnalysis {
        score,
        missing_keywords: reply.missing_keywords,
        suggestions: reply.suggestions,
        strengths: reply.strengths,
        weaknesses: reply.weaknesses,
        band: ScoreBand::for_score(score),
    })
}

pub async fn job_insights(
    llm: &dyn CompletionService,
    job_description: &str,
) -> Result<JobInsights, AppError> {
    let request = CompletionRequest::new(
        prompts::JOB_INSIGHTS_SYSTEM,
        prompts::job_insights_prompt(job_description),
    )
    .temperature(0.2)
    .max_tokens(1500);

    complete_json_or(llm, request, "Job insights", JobInsights::default).await
}

pub async fn skills_gap(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
) -> Result<SkillsGap, AppError> {
    let request = CompletionRequest::new(
        prompts::SKILLS_SYSTEM,
        prompts::skills_prompt(resume_text, job_description),
    )
    .temperature(0.2)
    .max_tokens(1000);

    let reply: SkillsReply =
        complete_json_or(llm, request, "Skills analysis", SkillsReply::default).await?;

    Ok(SkillsGap {
        resume_skills: reply.resume_skills,
        required_skills: reply.required_skills,
        missing_skills: reply.missing_skills,
        matching_skills: reply.matching_skills,
        skill_gaps: reply.skill_gaps,
        learning_path: reply.learning_path,
        match_percentage: reply.match_percentage.map_or(0, clamp_percentage),
    })
}
