//! Greedy word-level diff.
//!
//! Both inputs are split into alternating runs of whitespace and non-whitespace,
//! and the two token sequences are walked with one cursor each. On a mismatch the
//! engine looks ahead (never behind) for each cursor's token in the other sequence
//! and picks whichever side re-synchronises sooner.
//!
//! This is not an LCS solve. On ambiguous inputs the output differs from Myers
//! diff, and callers depend on the exact classification, so keep the lookahead
//! and its tie-break as they are.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Classification of a single token in the diff stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Added,
    Removed,
}

/// One token of the diff, tagged with how it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub text: String,
}

/// Ordered diff segments plus per-kind counts.
///
/// `added_count + removed_count + unchanged_count == segments.len()` always holds;
/// whitespace tokens are counted like any other token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub segments: Vec<DiffSegment>,
    pub added_count: usize,
    pub removed_count: usize,
    pub unchanged_count: usize,
}

impl DiffResult {
    fn push(&mut self, kind: SegmentKind, text: &str) {
        match kind {
            SegmentKind::Unchanged => self.unchanged_count += 1,
            SegmentKind::Added => self.added_count += 1,
            SegmentKind::Removed => self.removed_count += 1,
        }
        self.segments.push(DiffSegment {
            kind,
            text: text.to_string(),
        });
    }

    /// Concatenates the text of every segment whose kind is in `kinds`, in order.
    ///
    /// `reconstruct(&[Unchanged, Removed])` yields the original input and
    /// `reconstruct(&[Unchanged, Added])` yields the modified input.
    #[cfg(test)]
    pub fn reconstruct(&self, kinds: &[SegmentKind]) -> String {
        self.segments
            .iter()
            .filter(|s| kinds.contains(&s.kind))
            .map(|s| s.text.as_str())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenizer
// ────────────────────────────────────────────────────────────────────────────

/// Splits `text` into maximal runs of whitespace and non-whitespace.
///
/// Concatenating the tokens reproduces `text` exactly. An empty string yields
/// no tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0usize;
    let mut current_ws: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_ws = ch.is_whitespace();
        match current_ws {
            Some(prev) if prev != is_ws => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        current_ws = Some(is_ws);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

// ────────────────────────────────────────────────────────────────────────────
// Alignment
// ────────────────────────────────────────────────────────────────────────────

/// Offset of `needle` within `haystack[from + 1..]`, if it occurs there.
fn find_ahead(haystack: &[&str], from: usize, needle: &str) -> Option<usize> {
    haystack
        .get(from + 1..)?
        .iter()
        .position(|token| *token == needle)
}

/// Computes the greedy word-level diff of `original` against `modified`.
///
/// Total: any pair of strings, including empty ones, produces a well-formed result.
pub fn diff_text(original: &str, modified: &str) -> DiffResult {
    let orig = tokenize(original);
    let modi = tokenize(modified);

    let mut result = DiffResult::default();
    let (mut i, mut j) = (0usize, 0usize);

    while i < orig.len() && j < modi.len() {
        if orig[i] == modi[j] {
            result.push(SegmentKind::Unchanged, orig[i]);
            i += 1;
            j += 1;
            continue;
        }

        // Where does the original token show up again in the modified text,
        // and where does the modified token show up again in the original?
        let orig_token_ahead = find_ahead(&modi, j, orig[i]);
        let mod_token_ahead = find_ahead(&orig, i, modi[j]);

        match (orig_token_ahead, mod_token_ahead) {
            // Equal distances resolve to "added".
            (Some(in_mod), other) if other.map_or(true, |in_orig| in_mod <= in_orig) => {
                result.push(SegmentKind::Added, modi[j]);
                j += 1;
            }
            (_, Some(_)) => {
                result.push(SegmentKind::Removed, orig[i]);
                i += 1;
            }
            _ => {
                result.push(SegmentKind::Removed, orig[i]);
                result.push(SegmentKind::Added, modi[j]);
                i += 1;
                j += 1;
            }
        }
    }

    for token in &orig[i..] {
        result.push(SegmentKind::Removed, token);
    }
    for token in &modi[j..] {
        result.push(SegmentKind::Added, token);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(result: &DiffResult) -> Vec<(SegmentKind, &str)> {
        result
            .segments
            .iter()
            .map(|s| (s.kind, s.text.as_str()))
            .collect()
    }

    #[test]
    fn test_tokenize_keeps_whitespace_runs() {
        assert_eq!(
            tokenize("Led  a\nteam"),
            vec!["Led", "  ", "a", "\n", "team"]
        );
    }

    #[test]
    fn test_tokenize_leading_and_trailing_whitespace() {
        assert_eq!(tokenize("  hi "), vec!["  ", "hi", " "]);
    }

    #[test]
    fn test_tokenize_empty_is_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii() {
        assert_eq!(tokenize("résumé\u{00A0}café"), vec!["résumé", "\u{00A0}", "café"]);
    }

    #[test]
    fn test_identical_inputs_are_all_unchanged() {
        let text = "Senior engineer\n\n- Shipped things";
        let result = diff_text(text, text);
        assert!(result
            .segments
            .iter()
            .all(|s| s.kind == SegmentKind::Unchanged));
        assert_eq!(result.added_count, 0);
        assert_eq!(result.removed_count, 0);
        assert_eq!(result.unchanged_count, result.segments.len());
    }

    #[test]
    fn test_both_empty_yields_no_segments() {
        let result = diff_text("", "");
        assert!(result.segments.is_empty());
        assert_eq!(result.unchanged_count, 0);
    }

    #[test]
    fn test_empty_original_is_all_added() {
        let result = diff_text("", "hello world");
        assert_eq!(
            kinds_of(&result),
            vec![
                (SegmentKind::Added, "hello"),
                (SegmentKind::Added, " "),
                (SegmentKind::Added, "world"),
            ]
        );
        assert_eq!(result.added_count, 3);
        assert_eq!(result.removed_count, 0);
    }

    #[test]
    fn test_empty_modified_is_all_removed() {
        let result = diff_text("old text", "");
        assert_eq!(result.removed_count, 3);
        assert_eq!(result.added_count, 0);
    }

    #[test]
    fn test_no_common_tokens_pairs_removed_then_added() {
        let result = diff_text("alpha", "beta");
        assert_eq!(
            kinds_of(&result),
            vec![(SegmentKind::Removed, "alpha"), (SegmentKind::Added, "beta")]
        );
    }

    #[test]
    fn test_resume_bullet_rewrite() {
        let result = diff_text(
            "Managed a team of 5 engineers",
            "Led a cross-functional team of 5 senior engineers",
        );
        assert_eq!(
            kinds_of(&result),
            vec![
                (SegmentKind::Removed, "Managed"),
                (SegmentKind::Added, "Led"),
                (SegmentKind::Unchanged, " "),
                (SegmentKind::Unchanged, "a"),
                (SegmentKind::Unchanged, " "),
                (SegmentKind::Added, "cross-functional"),
                (SegmentKind::Added, " "),
                (SegmentKind::Unchanged, "team"),
                (SegmentKind::Unchanged, " "),
                (SegmentKind::Unchanged, "of"),
                (SegmentKind::Unchanged, " "),
                (SegmentKind::Unchanged, "5"),
                (SegmentKind::Unchanged, " "),
                (SegmentKind::Added, "senior"),
                (SegmentKind::Added, " "),
                (SegmentKind::Unchanged, "engineers"),
            ]
        );
        assert_eq!(result.added_count, 5);
        assert_eq!(result.removed_count, 1);
        assert_eq!(result.unchanged_count, 10);
    }

    #[test]
    fn test_equal_lookahead_distance_prefers_added() {
        // "b" is one token ahead in the modified text and "x" is one token
        // ahead in the original: a tie, so "x" is classified as added.
        let result = diff_text("a b x", "a x b");
        assert_eq!(result.segments[2].kind, SegmentKind::Added);
        assert_eq!(result.segments[2].text, "x");
    }

    #[test]
    fn test_removed_when_modified_token_is_closer_in_original() {
        // Original token "old" never reappears; modified token "keep" is ahead
        // in the original, so "old" is removed.
        let result = diff_text("old keep", "keep");
        assert_eq!(result.segments[0].kind, SegmentKind::Removed);
        assert_eq!(result.segments[0].text, "old");
    }

    #[test]
    fn test_reconstruction_of_both_sides() {
        let original = "  Built APIs in Go\n\n- Reduced latency by 20%  ";
        let modified = "Built REST APIs in Rust\n- Reduced p99 latency by 35%\n";
        let result = diff_text(original, modified);
        assert_eq!(
            result.reconstruct(&[SegmentKind::Unchanged, SegmentKind::Removed]),
            original
        );
        assert_eq!(
            result.reconstruct(&[SegmentKind::Unchanged, SegmentKind::Added]),
            modified
        );
    }

    #[test]
    fn test_counts_match_segment_length() {
        let pairs = [
            ("", "x"),
            ("a b c", "c b a"),
            ("one two three", "one three two four"),
            ("日本語 テキスト", "日本語  テキスト 追加"),
        ];
        for (a, b) in pairs {
            let r = diff_text(a, b);
            assert_eq!(
                r.added_count + r.removed_count + r.unchanged_count,
                r.segments.len(),
                "count mismatch for {a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn test_segment_serializes_with_type_tag() {
        let segment = DiffSegment {
            kind: SegmentKind::Added,
            text: "Rust".to_string(),
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "added");
        assert_eq!(json["text"], "Rust");
    }
}
