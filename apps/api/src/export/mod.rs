// Multi-format export of the optimized resume.
// One structural pass (structure.rs) feeds four independent renderers; each
// renderer decides how headers, list items, and blank lines look in its format.
// PDF layout is CPU-bound: handlers run `render` inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod handlers;
pub mod latex;
pub mod markdown;
pub mod pdf;
pub mod structure;

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use latex::LatexOptions;
pub use pdf::PdfLayout;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The PDF writer failed to serialize an in-memory document.
    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Formats
// ────────────────────────────────────────────────────────────────────────────

/// The four export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "txt")]
    PlainText,
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "latex")]
    Latex,
    #[serde(rename = "pdf")]
    Pdf,
}

impl Format {
    /// Parses a format tag. Only `txt`, `md`, `latex`, and `pdf` are recognised.
    pub fn parse(tag: &str) -> Result<Self, ExportError> {
        match tag {
            "txt" => Ok(Format::PlainText),
            "md" => Ok(Format::Markdown),
            "latex" => Ok(Format::Latex),
            "pdf" => Ok(Format::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Format::PlainText => "txt",
            Format::Markdown => "md",
            Format::Latex => "latex",
            Format::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::PlainText => "text/plain",
            Format::Markdown => "text/markdown",
            Format::Latex => "application/x-latex",
            Format::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::PlainText => "txt",
            Format::Markdown => "md",
            Format::Latex => "tex",
            Format::Pdf => "pdf",
        }
    }
}

impl FromStr for Format {
    type Err = ExportError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Format::parse(tag)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Per-backend layout parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub latex: LatexOptions,
    pub pdf: PdfLayout,
}

/// Returns the default export config: A4 paper for both LaTeX and PDF.
pub fn default_export_config() -> ExportConfig {
    ExportConfig {
        latex: LatexOptions::default(),
        pdf: PdfLayout::default(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// A rendered export, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    /// Suggested download name: the caller's file name with its extension replaced.
    pub file_name: String,
}

/// Renders `text` in the requested format.
///
/// The only failure for a recognised format is a PDF serialization error.
pub fn render_format(
    text: &str,
    file_name: &str,
    format: Format,
    config: &ExportConfig,
) -> Result<RenderedDocument, ExportError> {
    let bytes = match format {
        Format::PlainText => text.as_bytes().to_vec(),
        Format::Markdown => markdown::to_markdown(text).into_bytes(),
        Format::Latex => latex::to_latex(text, &config.latex).into_bytes(),
        Format::Pdf => pdf::to_pdf(text, &config.pdf)?,
    };

    Ok(RenderedDocument {
        bytes,
        mime_type: format.mime_type(),
        extension: format.extension(),
        file_name: download_file_name(file_name, format),
    })
}

/// Renders `text` for a format given by its tag (`txt`, `md`, `latex`, `pdf`).
pub fn render(
    text: &str,
    file_name: &str,
    format_tag: &str,
    config: &ExportConfig,
) -> Result<RenderedDocument, ExportError> {
    render_format(text, file_name, Format::parse(format_tag)?, config)
}

static TRAILING_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("static regex"));

/// Replaces the extension of `file_name` with the format's extension.
///
/// Control characters, quotes and backslashes become `_` so the name is
/// always usable in a `Content-Disposition` header.
pub fn download_file_name(file_name: &str, format: Format) -> String {
    let base = TRAILING_EXTENSION.replace(file_name.trim(), "");
    let base = if base.is_empty() { "resume" } else { base.as_ref() };
    let base: String = base
        .chars()
        .map(|c| if c.is_control() || c == '"' || c == '\\' { '_' } else { c })
        .collect();
    format!("{base}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "JANE DOE\njane@example.com\n\nEXPERIENCE\n- Built a 50% faster pipeline\n- Led 3 engineers\n\nSkills: Rust, Go";

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(Format::parse("txt").unwrap(), Format::PlainText);
        assert_eq!(Format::parse("md").unwrap(), Format::Markdown);
        assert_eq!(Format::parse("latex").unwrap(), Format::Latex);
        assert_eq!(Format::parse("pdf").unwrap(), Format::Pdf);
    }

    #[test]
    fn test_parse_unknown_tag_is_unsupported() {
        for tag in ["docx", "tex", "PDF", ""] {
            match Format::parse(tag) {
                Err(ExportError::UnsupportedFormat(t)) => assert_eq!(t, tag),
                other => panic!("expected UnsupportedFormat for {tag:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_render_rejects_unknown_format() {
        let result = render(RESUME, "cv.pdf", "html", &default_export_config());
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_plain_text_is_byte_identical() {
        let text = "  Ünïcode résumé\r\n\n\ttabs & 100% {braces}  ";
        let doc = render(text, "cv.txt", "txt", &default_export_config()).unwrap();
        assert_eq!(String::from_utf8(doc.bytes).unwrap(), text);
        assert_eq!(doc.mime_type, "text/plain");
        assert_eq!(doc.extension, "txt");
    }

    #[test]
    fn test_pdf_has_signature() {
        let doc = render(RESUME, "cv", "pdf", &default_export_config()).unwrap();
        assert!(doc.bytes.starts_with(b"%PDF-"));
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[test]
    fn test_markdown_has_no_latex_markers() {
        let doc = render(RESUME, "cv", "md", &default_export_config()).unwrap();
        let md = String::from_utf8(doc.bytes).unwrap();
        assert!(!md.contains("\\documentclass"));
        assert!(!md.contains("\\begin{document}"));
        assert_eq!(doc.mime_type, "text/markdown");
    }

    #[test]
    fn test_latex_body_ends_with_document_close() {
        let doc = render(RESUME, "cv", "latex", &default_export_config()).unwrap();
        let tex = String::from_utf8(doc.bytes).unwrap();
        let (_, body) = tex.split_once("\\begin{document}").unwrap();
        assert!(body.ends_with("\\end{document}"));
        assert_eq!(doc.extension, "tex");
    }

    #[test]
    fn test_empty_text_renders_in_every_format() {
        for tag in ["txt", "md", "latex", "pdf"] {
            let doc = render("", "empty", tag, &default_export_config()).unwrap();
            match tag {
                "latex" | "pdf" => assert!(!doc.bytes.is_empty(), "{tag} should not be empty"),
                _ => assert_eq!(String::from_utf8(doc.bytes).unwrap(), ""),
            }
        }
    }

    #[test]
    fn test_download_file_name_replaces_extension() {
        assert_eq!(download_file_name("resume.pdf", Format::Markdown), "resume.md");
        assert_eq!(download_file_name("my.cv.docx", Format::Latex), "my.cv.tex");
        assert_eq!(download_file_name("optimized", Format::Pdf), "optimized.pdf");
        assert_eq!(download_file_name("", Format::PlainText), "resume.txt");
    }

    #[test]
    fn test_download_file_name_strips_header_unsafe_chars() {
        assert_eq!(download_file_name("cv\u{1}x.txt", Format::PlainText), "cv_x.txt");
        assert_eq!(download_file_name("a\"b\\c\r\nd\te", Format::Pdf), "a_b_c__d_e.pdf");
    }

    #[test]
    fn test_format_serde_uses_tags() {
        let format: Format = serde_json::from_str("\"latex\"").unwrap();
        assert_eq!(format, Format::Latex);
        assert_eq!(serde_json::to_string(&Format::Markdown).unwrap(), "\"md\"");
    }
}
