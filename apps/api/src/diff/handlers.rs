use axum::Json;
use serde::Deserialize;

use crate::diff::{compare, ComparisonReport};

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub original: String,
    pub modified: String,
}

/// POST /api/v1/compare
///
/// Word-level diff plus word/character/line statistics. Empty inputs are valid.
pub async fn handle_compare(Json(req): Json<CompareRequest>) -> Json<ComparisonReport> {
    let report = compare(&req.original, &req.modified);
    tracing::debug!(
        added = report.diff.added_count,
        removed = report.diff.removed_count,
        "Compared resume versions"
    );
    Json(report)
}
