//! Markdown backend.

use crate::export::structure::{classify_lines, LineKind};

/// Converts resume text to Markdown.
///
/// Consecutive list items form one `- ` list, header lines become `## ` headings
/// with their first colon dropped, and every other line is its own paragraph.
/// A blank line ends the current list. Leading and trailing blank lines are trimmed.
pub fn to_markdown(text: &str) -> String {
    let mut markdown = String::with_capacity(text.len() + 64);
    let mut in_list = false;

    for line in classify_lines(text) {
        match line.kind {
            LineKind::Blank => {
                markdown.push('\n');
                in_list = false;
            }
            LineKind::ListItem => {
                if !in_list {
                    markdown.push('\n');
                    in_list = true;
                }
                markdown.push_str("- ");
                markdown.push_str(line.item_text());
                markdown.push('\n');
            }
            LineKind::Header | LineKind::Text => {
                if in_list {
                    markdown.push('\n');
                    in_list = false;
                }
                if line.kind == LineKind::Header {
                    markdown.push_str("\n## ");
                    markdown.push_str(&line.text.replacen(':', "", 1));
                    markdown.push_str("\n\n");
                } else {
                    markdown.push_str(line.text);
                    markdown.push_str("\n\n");
                }
            }
        }
    }

    markdown.trim().to_string()
}
