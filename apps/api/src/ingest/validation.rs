//! Upload checks applied before any extraction work.

use super::IngestError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TXT_MIME: &str = "text/plain";

/// The three accepted upload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

impl FileKind {
    /// Matches a media type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Some(FileKind::Pdf),
            DOCX_MIME => Some(FileKind::Docx),
            TXT_MIME => Some(FileKind::PlainText),
            _ => None,
        }
    }

    /// Used when the client sends no media type or a generic one.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())?;
        match extension.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "txt" => Some(FileKind::PlainText),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            FileKind::Pdf => PDF_MIME,
            FileKind::Docx => DOCX_MIME,
            FileKind::PlainText => TXT_MIME,
        }
    }
}

/// Rejects uploads over `limit` bytes, then anything that is not PDF, DOCX, or TXT.
pub fn validate_upload(size: usize, media_type: &str, limit: usize) -> Result<FileKind, IngestError> {
    if size > limit {
        return Err(IngestError::FileTooLarge { size, limit });
    }
    FileKind::from_media_type(media_type)
        .ok_or_else(|| IngestError::UnsupportedFileType(media_type.to_string()))
}

/// Human-readable size in base-1024 units with at most two decimals: `0 Bytes`, `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}
