// Prompt constants for the optimizer features.
// Templates use `{placeholder}` markers replaced before sending; the shared
// JSON-only and no-placeholder fragments come from llm_client::prompts.

use crate::llm_client::prompts::{excerpt, JSON_ONLY_INSTRUCTION, NO_PLACEHOLDERS_INSTRUCTION};

use super::models::{CoverLetterTone, EmailType};

// ────────────────────────────────────────────────────────────────────────────
// System prompts
// ────────────────────────────────────────────────────────────────────────────

pub const ATS_SYSTEM: &str =
    "You are an expert ATS analyst. Always return valid JSON only, no additional text.";

pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume writer specializing in ATS \
    optimization. Return only the optimized resume text, no explanations or metadata.";

pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. Return only the \
    cover letter text, no subject line, no signatures, no explanations or metadata.";

pub const EMAIL_SYSTEM: &str = "You are an expert professional email writer. Return only the \
    email body text, no subject line, no signatures, no explanations.";

pub const JOB_INSIGHTS_SYSTEM: &str =
    "You are an expert job market analyst. Always return valid JSON only, no additional text.";

pub const SKILLS_SYSTEM: &str =
    "You are an expert skills analyst. Always return valid JSON only, no additional text.";

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

const ATS_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) analyst. Analyze the following resume against the job description and provide a comprehensive assessment.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Return a JSON object with the following structure:
{
  "score": <number between 0-100>,
  "missingKeywords": [<important keywords from the job description that are missing in the resume>],
  "suggestions": [<specific improvement suggestions>],
  "strengths": [<what the resume does well>],
  "weaknesses": [<areas that need improvement>]
}

Focus on:
1. Keyword matching (especially technical skills, tools, and qualifications)
2. Experience relevance
3. Formatting and ATS-friendliness
4. Missing qualifications or skills mentioned in the job description

{json_only}"#;

const OPTIMIZE_TEMPLATE: &str = r#"You are an expert resume writer specializing in ATS optimization. Optimize the following resume to better match the job description while keeping it authentic and truthful.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

MISSING KEYWORDS TO INCORPORATE:
{missing_keywords}

Instructions:
1. Naturally incorporate missing keywords into relevant sections
2. Keep the original achievements and experiences (do not fabricate)
3. Improve formatting for ATS compatibility (standard section headers, no graphics or tables)
4. Strengthen bullet points to align with the job requirements
5. Keep a professional, authentic tone
6. Do not add false information or experiences

Return the optimized resume text only, without explanations or metadata."#;

const COVER_LETTER_TEMPLATE: &str = r#"Write a {tone_description} cover letter for the following job application.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Instructions:
1. Keep it to 3-4 paragraphs (concise version: 2-3 paragraphs)
2. {tone_instruction}
3. Highlight 2-3 key qualifications that match the job
4. Show genuine interest in the role
5. Include a strong closing paragraph
6. {no_placeholders}

Return only the cover letter text. No subject line, no signatures, no explanations."#;

const EMAIL_TEMPLATE: &str = r#"Generate a professional {email_purpose} for the following job application.

RESUME SUMMARY:
{resume_text}

JOB DESCRIPTION:
{job_description}

Instructions:
1. Keep the email concise (3-4 short paragraphs max)
2. Professional and enthusiastic tone
3. Highlight 2-3 key qualifications from the resume that match the job
4. Show genuine interest in the role and company
5. Include a clear call-to-action
6. {no_placeholders}

Return only the email body text (no subject line, no signature)."#;

const JOB_INSIGHTS_TEMPLATE: &str = r#"Analyze the following job description and provide structured insights.

JOB DESCRIPTION:
{job_description}

Return a JSON object with this exact structure:
{
  "mustHave": [<must-have requirements>],
  "niceToHave": [<nice-to-have or preferred qualifications>],
  "salaryEstimate": "<estimated salary range based on role and location, or 'Not specified'>",
  "requiredQualifications": [<required qualifications>],
  "preferredQualifications": [<preferred qualifications>],
  "redFlags": [<potential red flags or concerns>],
  "companyCulture": "<brief insight about company culture>",
  "competitorProfile": "<brief description of what other candidates likely have>"
}

Focus on:
1. Clearly distinguish must-haves from nice-to-haves
2. Extract salary hints from the description or estimate from the role
3. Identify concerning patterns (high turnover, unrealistic expectations)
4. Infer company culture from language and benefits
5. Describe the typical candidate profile for this role

{json_only}"#;

const SKILLS_TEMPLATE: &str = r#"Analyze the skills gap between the resume and the job description.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Return a JSON object with this exact structure:
{
  "resumeSkills": [<skills found in the resume>],
  "requiredSkills": [<skills required by the job>],
  "missingSkills": [<required skills missing from the resume>],
  "matchingSkills": [<skills present in both>],
  "skillGaps": [
    {"skill": "<skill name>", "importance": "<high|medium|low>", "reason": "<why it matters for the role>"}
  ],
  "learningPath": [
    {"skill": "<skill name>", "resources": [<learning resource suggestions>], "timeframe": "<estimated time to learn>"}
  ],
  "matchPercentage": <number between 0-100>
}

Focus on:
1. Extract technical and soft skills from both documents
2. Identify critical missing skills
3. Prioritize skills by importance to the role
4. Suggest practical learning resources
5. Calculate the overall skill match percentage

{json_only}"#;

/// Cover letter and email inputs are cut to keep requests inside free-tier limits.
const COVER_LETTER_EXCERPT_CHARS: usize = 1000;
const EMAIL_RESUME_EXCERPT_CHARS: usize = 500;
const EMAIL_JD_EXCERPT_CHARS: usize = 800;

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn ats_prompt(resume_text: &str, job_description: &str) -> String {
    ATS_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

pub fn optimize_prompt(resume_text: &str, job_description: &str, missing_keywords: &[String]) -> String {
    OPTIMIZE_TEMPLATE
        .replace("{missing_keywords}", &missing_keywords.join(", "))
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

pub fn cover_letter_prompt(resume_text: &str, job_description: &str, tone: CoverLetterTone) -> String {
    COVER_LETTER_TEMPLATE
        .replace("{tone_description}", tone.description())
        .replace("{tone_instruction}", tone.instruction())
        .replace("{no_placeholders}", NO_PLACEHOLDERS_INSTRUCTION)
        .replace(
            "{job_description}",
            &excerpt(job_description, COVER_LETTER_EXCERPT_CHARS),
        )
        .replace("{resume_text}", &excerpt(resume_text, COVER_LETTER_EXCERPT_CHARS))
}

pub fn email_prompt(resume_text: &str, job_description: &str, email_type: EmailType) -> String {
    EMAIL_TEMPLATE
        .replace("{email_purpose}", email_type.purpose())
        .replace("{no_placeholders}", NO_PLACEHOLDERS_INSTRUCTION)
        .replace("{job_description}", &excerpt(job_description, EMAIL_JD_EXCERPT_CHARS))
        .replace("{resume_text}", &excerpt(resume_text, EMAIL_RESUME_EXCERPT_CHARS))
}

pub fn job_insights_prompt(job_description: &str) -> String {
    JOB_INSIGHTS_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description)
}

pub fn skills_prompt(resume_text: &str, job_description: &str) -> String {
    SKILLS_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}
