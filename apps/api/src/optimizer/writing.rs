//! Prose-producing features. Résumé rewrites and cover letters stream; the
//! outreach email is returned whole.

use crate::errors::AppError;
use crate::llm_client::{CompletionRequest, CompletionService, TextStream};

use super::models::{CoverLetterTone, EmailType, GeneratedEmail};
use super::prompts;

pub async fn optimize_resume_stream(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
    missing_keywords: &[String],
) -> Result<TextStream, AppError> {
    let request = CompletionRequest::new(
        prompts::OPTIMIZE_SYSTEM,
        prompts::optimize_prompt(resume_text, job_description, missing_keywords),
    )
    .temperature(0.3)
    .max_tokens(2000);

    llm.stream(request)
        .await
        .map_err(|e| AppError::Llm(format!("Resume optimization failed: {e}")))
}

pub async fn cover_letter_stream(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
    tone: CoverLetterTone,
) -> Result<TextStream, AppError> {
    let request = CompletionRequest::new(
        prompts::COVER_LETTER_SYSTEM,
        prompts::cover_letter_prompt(resume_text, job_description, tone),
    )
    .temperature(0.7)
    .max_tokens(1200);

    llm.stream(request)
        .await
        .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))
}

pub async fn generate_email(
    llm: &dyn CompletionService,
    resume_text: &str,
    job_description: &str,
    email_type: EmailType,
) -> Result<GeneratedEmail, AppError> {
    let request = CompletionRequest::new(
        prompts::EMAIL_SYSTEM,
        prompts::email_prompt(resume_text, job_description, email_type),
    )
    .temperature(0.7)
    .max_tokens(800);

    let email = llm
        .complete(request)
        .await
        .map_err(|e| AppError::Llm(format!("Email generation failed: {e}")))?;

    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Llm("Email generation failed: empty reply".to_string()));
    }

    Ok(GeneratedEmail {
        email: email.to_string(),
        email_type,
    })
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;
    use crate::llm_client::testing::FakeCompletion;

    #[tokio::test]
    async fn test_optimize_streams_chunks_in_order() {
        let llm = FakeCompletion::streaming(&["JANE ", "DOE\n", "Rust engineer"]);
        let stream = optimize_resume_stream(&llm, "resume", "jd", &["Rust".to_string()])
            .await
            .unwrap();
        let chunks: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), "JANE DOE\nRust engineer");

        let request = llm.last_request().unwrap();
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 2000);
        assert!(request.prompt.contains("Rust"));
    }

    #[tokio::test]
    async fn test_cover_letter_uses_tone_and_limits() {
        let llm = FakeCompletion::streaming(&["Dear team", ", hello"]);
        let stream = cover_letter_stream(&llm, "resume", "jd", CoverLetterTone::Enthusiastic)
            .await
            .unwrap();
        let chunks: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), "Dear team, hello");

        let request = llm.last_request().unwrap();
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1200);
        assert!(request.prompt.contains("enthusiastic and energetic"));
    }

    #[tokio::test]
    async fn test_stream_open_failure_is_llm_error() {
        let llm = FakeCompletion::failing();
        let result = optimize_resume_stream(&llm, "r", "j", &[]).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_email_is_trimmed() {
        let llm = FakeCompletion::replying("\n\n  Hello hiring team,\nThanks.  \n");
        let email = generate_email(&llm, "r", "j", EmailType::ThankYou).await.unwrap();
        assert_eq!(email.email, "Hello hiring team,\nThanks.");
        assert_eq!(email.email_type, EmailType::ThankYou);

        let request = llm.last_request().unwrap();
        assert_eq!(request.max_tokens, 800);
        assert!(request.prompt.contains("thank-you email"));
    }

    #[tokio::test]
    async fn test_blank_email_reply_is_error() {
        let llm = FakeCompletion::replying("   ");
        let result = generate_email(&llm, "r", "j", EmailType::Application).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
