// Résumé file intake: upload validation, text extraction from PDF/DOCX/TXT,
// and job-board URL recognition. Extraction is CPU-bound (PDF parsing in
// particular), so the handler runs it inside tokio::task::spawn_blocking.

pub mod extract;
pub mod handlers;
pub mod job_url;
pub mod validation;

use thiserror::Error;

pub use extract::extract_text;
pub use job_url::{check_job_url, JobUrlCheck};
pub use validation::{format_file_size, validate_upload, FileKind};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File size must be less than {} (got {})", size_label(.limit), size_label(.size))]
    FileTooLarge { size: usize, limit: usize },

    #[error("File must be PDF, DOCX, or TXT (got {0})")]
    UnsupportedFileType(String),

    #[error("PDF appears to be empty or contains no extractable text. It may be image-based or encrypted.")]
    EmptyPdf,

    #[error("PDF is password-protected. Please remove the password and try again.")]
    EncryptedPdf,

    #[error("Failed to parse PDF file: {0}")]
    InvalidPdf(String),

    #[error("Failed to parse DOCX file: {0}")]
    Docx(String),

    #[error("Failed to parse text file: not valid UTF-8")]
    InvalidText,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

fn size_label(bytes: &usize) -> String {
    format_file_size(*bytes as u64)
}
