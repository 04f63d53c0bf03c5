// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Folding independent batch responses into one review

use tracing::{debug, warn};

use crate::comment::{ReviewResult, SeverityCounts};
use crate::payload::ReviewResponse;

/// Summary used when no successful batch supplied one
pub const DEFAULT_FALLBACK_SUMMARY: &str = "review complete";

/// Combines batch responses in batch order
#[derive(Debug, Clone)]
pub struct ReviewMerger {
    fallback_summary: String,
}

impl Default for ReviewMerger {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_SUMMARY)
    }
}

impl ReviewMerger {
    /// Create a merger with the given fallback summary
    #[must_use]
    pub fn new(fallback_summary: impl Into<String>) -> Self {
        Self {
            fallback_summary: fallback_summary.into(),
        }
    }

    /// Merge `responses` into one result
    ///
    /// Failed responses are skipped. The score is the floor average of the
    /// successful batches' scores (each clamped to 0-100), or 0 when none
    /// succeeded. Summaries are trimmed; blank ones are dropped and the rest
    /// joined with single spaces, falling back to the configured summary
    /// when none remain. Statistics are tallied from the merged comments. The
    /// returned result has `success == false`; the caller decides when the
    /// review as a whole succeeded.
    #[must_use]
    pub fn merge(&self, responses: &[ReviewResponse]) -> ReviewResult {
        let mut result = ReviewResult {
            batches_total: responses.len(),
            ..ReviewResult::default()
        };
        let mut total_score: u64 = 0;
        let mut valid: u64 = 0;
        let mut summaries: Vec<&str> = Vec::new();

        for (index, response) in responses.iter().enumerate() {
            if !response.success {
                result.batches_failed += 1;
                continue;
            }

            let reported = response.statistics;
            let counted = SeverityCounts::tally(&response.comments);
            if reported != counted {
                debug!(
                    batch = index + 1,
                    reported = ?reported,
                    counted = ?counted,
                    "Batch statistics disagree with its comments"
                );
            }

            result
                .comments
                .extend(response.comments.iter().cloned().map(|mut comment| {
                    if comment.suggestion.as_deref().is_some_and(str::is_empty) {
                        comment.suggestion = None;
                    }
                    comment
                }));

            let score = response.overall_score.clamp(0, 100);
            if score != response.overall_score {
                warn!(
                    batch = index + 1,
                    score = response.overall_score,
                    "Batch score out of range, clamped"
                );
            }
            total_score += score.unsigned_abs();
            valid += 1;

            let summary = response.summary.trim();
            if !summary.is_empty() {
                summaries.push(summary);
            }
        }

        result.overall_score = if valid == 0 {
            0
        } else {
            u32::try_from(total_score / valid).unwrap_or(100)
        };
        result.summary = if summaries.is_empty() {
            self.fallback_summary.clone()
        } else {
            summaries.join(" ")
        };
        result.statistics = SeverityCounts::tally(&result.comments);
        result
    }
}
