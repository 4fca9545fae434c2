//! Job-posting URL recognition. Only the URL itself is inspected; postings are
//! never fetched.

use reqwest::Url;
use serde::Serialize;

use super::IngestError;

/// Host fragments of the job boards the client knows how to talk about.
const JOB_BOARDS: &[(&str, &str)] = &[
    ("linkedin.com", "LinkedIn"),
    ("indeed.com", "Indeed"),
    ("glassdoor.com", "Glassdoor"),
    ("monster.com", "Monster"),
    ("ziprecruiter.com", "ZipRecruiter"),
    ("careerbuilder.com", "CareerBuilder"),
    ("dice.com", "Dice"),
];

const LINKEDIN_NOTE: &str = "LinkedIn job postings cannot be accessed directly. \
                             Please copy and paste the job description manually.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobUrlCheck {
    /// True when the host belongs to a known job board.
    pub valid: bool,
    pub board: Option<&'static str>,
    pub note: Option<&'static str>,
}

/// Parses `url` and matches its host against the known job boards.
///
/// Unparseable input and non-HTTP schemes are `InvalidUrl`; a well-formed URL
/// on any other host is a valid URL but not a job posting (`valid: false`).
pub fn check_job_url(url: &str) -> Result<JobUrlCheck, IngestError> {
    let parsed = Url::parse(url.trim()).map_err(|e| IngestError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(IngestError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let board = JOB_BOARDS
        .iter()
        .find(|(domain, _)| host.contains(domain))
        .map(|(_, name)| *name);

    Ok(JobUrlCheck {
        valid: board.is_some(),
        board,
        note: (board == Some("LinkedIn")).then_some(LINKEDIN_NOTE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognises_each_board() {
        for (url, expected) in [
            ("https://www.linkedin.com/jobs/view/123", "LinkedIn"),
            ("https://www.indeed.com/viewjob?jk=abc", "Indeed"),
            ("https://www.glassdoor.com/job-listing/x", "Glassdoor"),
            ("https://www.monster.com/job-openings/x", "Monster"),
            ("https://www.ziprecruiter.com/c/x/Job/y", "ZipRecruiter"),
            ("https://www.careerbuilder.com/job/x", "CareerBuilder"),
            ("https://www.dice.com/job-detail/x", "Dice"),
        ] {
            let check = check_job_url(url).unwrap();
            assert!(check.valid, "{url} should be valid");
            assert_eq!(check.board, Some(expected));
        }
    }

    #[test]
    fn test_linkedin_carries_manual_note() {
        let check = check_job_url("https://linkedin.com/jobs/view/1").unwrap();
        assert!(check.note.unwrap().contains("paste"));

        let check = check_job_url("https://indeed.com/viewjob?jk=1").unwrap();
        assert_eq!(check.note, None);
    }

    #[test]
    fn test_host_match_is_case_insensitive() {
        let check = check_job_url("HTTPS://WWW.INDEED.COM/viewjob").unwrap();
        assert_eq!(check.board, Some("Indeed"));
    }

    #[test]
    fn test_unknown_host_is_not_a_job_board() {
        let check = check_job_url("https://careers.example.com/openings/42").unwrap();
        assert_eq!(
            check,
            JobUrlCheck {
                valid: false,
                board: None,
                note: None
            }
        );
    }

    #[test]
    fn test_board_name_in_path_does_not_count() {
        let check = check_job_url("https://example.com/linkedin.com").unwrap();
        assert!(!check.valid);
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        for url in ["not a url", "", "linkedin.com/jobs/1"] {
            assert!(matches!(check_job_url(url), Err(IngestError::InvalidUrl(_))), "{url}");
        }
        assert!(matches!(
            check_job_url("ftp://indeed.com/jobs"),
            Err(IngestError::InvalidUrl(_))
        ));
    }
}
