//! Structural inference over a flat resume text.
//!
//! Resume text arrives as plain lines with no markup, so structure is guessed
//! line by line:
//! - list item: starts with `•`, `-`, or a number followed by `.`
//! - header: shorter than 50 characters and either all upper-case, Title Case
//!   words, or containing a colon
//! - blank: whitespace only
//!
//! List detection wins over header detection, so `- SQL` stays a list item.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_HEADER_CHARS: usize = 50;

static TITLE_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+( [A-Z][a-z]+)*$").expect("static regex"));
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("static regex"));
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:•|-|\d+\.)\s*").expect("static regex"));
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Header,
    ListItem,
    Text,
}

/// A trimmed source line and its inferred role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub kind: LineKind,
}

impl<'a> Line<'a> {
    /// The line without its list marker. Identity for non-list lines.
    pub fn item_text(&self) -> &'a str {
        match self.kind {
            LineKind::ListItem => strip_list_marker(self.text),
            _ => self.text,
        }
    }
}

pub fn is_list_item(trimmed: &str) -> bool {
    trimmed.starts_with('•') || trimmed.starts_with('-') || NUMBERED_ITEM.is_match(trimmed)
}

pub fn is_header_candidate(trimmed: &str) -> bool {
    trimmed.chars().count() < MAX_HEADER_CHARS
        && (trimmed == trimmed.to_uppercase()
            || TITLE_CASE.is_match(trimmed)
            || trimmed.contains(':'))
}

/// Removes a leading `•`, `-`, or `N.` marker and the whitespace after it.
pub fn strip_list_marker(trimmed: &str) -> &str {
    match LIST_MARKER.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    }
}

pub fn classify_line(line: &str) -> Line<'_> {
    let text = line.trim();
    let kind = if text.is_empty() {
        LineKind::Blank
    } else if is_list_item(text) {
        LineKind::ListItem
    } else if is_header_candidate(text) {
        LineKind::Header
    } else {
        LineKind::Text
    };
    Line { text, kind }
}

/// Classifies every newline-delimited line, blanks included.
pub fn classify_lines(text: &str) -> Vec<Line<'_>> {
    text.split('\n').map(classify_line).collect()
}

/// Splits on runs of two or more line breaks (whitespace between them allowed).
///
/// Each paragraph keeps only its non-blank lines; paragraphs with none are dropped.
pub fn paragraphs(text: &str) -> Vec<Vec<Line<'_>>> {
    PARAGRAPH_BREAK
        .split(text)
        .map(|para| {
            para.split('\n')
                .map(classify_line)
                .filter(|l| l.kind != LineKind::Blank)
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
        .collect()
}
