// Model-backed résumé features: ATS scoring, rewrites, cover letters, outreach
// emails, job insights, and skills-gap analysis. Every call goes through the
// CompletionService in AppState; inputs are validated before any model call.

pub mod analysis;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod writing;
