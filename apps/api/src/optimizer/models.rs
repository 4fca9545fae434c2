//! Request options and response shapes for the optimizer features.
//! Field names are camelCase on the wire to match the browser client.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// ATS analysis
// ────────────────────────────────────────────────────────────────────────────

/// Score bands used by the client to colour the ATS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    /// `low` below 50, `medium` below 75, `high` otherwise.
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=49 => ScoreBand::Low,
            50..=74 => ScoreBand::Medium,
            _ => ScoreBand::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsAnalysis {
    pub score: u8,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub band: ScoreBand,
}

/// The model's reply before clamping. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsReply {
    pub score: Option<f64>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job insights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInsights {
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub salary_estimate: String,
    pub required_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub red_flags: Vec<String>,
    pub company_culture: String,
    pub competitor_profile: String,
}

impl Default for JobInsights {
    /// Returned when the model's reply cannot be parsed.
    fn default() -> Self {
        Self {
            must_have: Vec::new(),
            nice_to_have: Vec::new(),
            salary_estimate: "Not specified".to_string(),
            required_qualifications: Vec::new(),
            preferred_qualifications: Vec::new(),
            red_flags: Vec::new(),
            company_culture: "Unable to analyze".to_string(),
            competitor_profile: "Unable to analyze".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills gap
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGap {
    pub skill: String,
    /// `high`, `medium`, or `low` as reported by the model.
    pub importance: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningStep {
    pub skill: String,
    pub resources: Vec<String>,
    pub timeframe: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsGap {
    pub resume_skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
    pub learning_path: Vec<LearningStep>,
    pub match_percentage: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsReply {
    pub resume_skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
    pub learning_path: Vec<LearningStep>,
    pub match_percentage: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Writing options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Concise,
}

impl CoverLetterTone {
    /// Unknown or missing tones fall back to `Professional`.
    pub fn parse_or_default(tone: Option<&str>) -> Self {
        match tone.map(str::trim) {
            Some("enthusiastic") => CoverLetterTone::Enthusiastic,
            Some("concise") => CoverLetterTone::Concise,
            _ => CoverLetterTone::Professional,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CoverLetterTone::Professional => "professional and polished",
            CoverLetterTone::Enthusiastic => "enthusiastic and energetic",
            CoverLetterTone::Concise => "concise and direct",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            CoverLetterTone::Professional => "Professional, polished tone",
            CoverLetterTone::Enthusiastic => "Enthusiastic, energetic tone showing passion",
            CoverLetterTone::Concise => "Concise, direct tone - get to the point quickly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmailType {
    #[serde(rename = "application")]
    Application,
    #[serde(rename = "follow-up")]
    FollowUp,
    #[serde(rename = "thank-you")]
    ThankYou,
}

impl EmailType {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "application" => Some(EmailType::Application),
            "follow-up" => Some(EmailType::FollowUp),
            "thank-you" => Some(EmailType::ThankYou),
            _ => None,
        }
    }

    pub fn purpose(self) -> &'static str {
        match self {
            EmailType::Application => "application email to submit with your resume",
            EmailType::FollowUp => "follow-up email to send a week after applying",
            EmailType::ThankYou => "thank-you email to send after an interview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedEmail {
    pub email: String,
    #[serde(rename = "type")]
    pub email_type: EmailType,
}
