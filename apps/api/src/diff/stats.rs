//! Text statistics and the comparison report shown next to the diff view.

use serde::{Deserialize, Serialize};

use crate::diff::engine::{diff_text, DiffResult};

/// Word, character, and line counts for a block of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub words: usize,
    /// Unicode scalar values, untrimmed.
    pub characters: usize,
    /// Newline-delimited segments; text without a newline is one line.
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
            lines: text.split('\n').count(),
        }
    }
}

/// Diff plus the headline numbers for the comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub diff: DiffResult,
    pub original_stats: TextStats,
    pub modified_stats: TextStats,
    /// `100 * (added + removed) / (original words + modified words)`, one decimal.
    pub change_percentage: f64,
}

/// Compares two texts. Pure and total.
pub fn compare(original: &str, modified: &str) -> ComparisonReport {
    let diff = diff_text(original, modified);
    let original_stats = TextStats::of(original);
    let modified_stats = TextStats::of(modified);

    let total_changes = (diff.added_count + diff.removed_count) as f64;
    let total_words = (original_stats.words + modified_stats.words) as f64;
    let change_percentage = if total_words > 0.0 {
        round_one_decimal(total_changes / total_words * 100.0)
    } else {
        0.0
    };

    ComparisonReport {
        diff,
        original_stats,
        modified_stats,
        change_percentage,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
