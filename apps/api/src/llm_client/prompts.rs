// Shared prompt fragments. Each feature keeps its own templates alongside its
// handlers (see optimizer/prompts.rs); only cross-cutting pieces live here.

/// Appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "CRITICAL: Return ONLY valid JSON. \
    No markdown, no code blocks, no explanations. Start with { and end with }.";

/// Appended to every prompt that produces user-facing prose.
pub const NO_PLACEHOLDERS_INSTRUCTION: &str =
    "No placeholders - write complete, ready-to-use text.";

/// Truncates `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
