// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Batched code review
//!
//! Files are split by [`BatchPlanner`] and sent one batch at a time, in
//! order. A batch whose call fails is logged and dropped; the remaining
//! batches still contribute to the merged result.

use p4ai_perforce::P4Runner;
use p4ai_review::{
    BatchInfo, BatchPlanner, JudgementService, RequestType, ReviewMerger, ReviewResponse,
    ReviewResult, WebhookRequest,
};
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::progress::ProgressEvent;
use crate::workflow::Workflow;

impl<R: P4Runner, S: JudgementService> Workflow<R, S> {
    /// Review changelist `number`
    ///
    /// Never fails: a fatal error (the changelist cannot be fetched or has
    /// no files) yields `success == false` with `error` set. Failed batches
    /// are counted in `batches_failed` and otherwise ignored.
    pub async fn review(&self, number: u32) -> ReviewResult {
        match self.run_review(number).await {
            Ok(result) => result,
            Err(err) => {
                warn!(change = number, error = %err, "Review request failed");
                ReviewResult::failure(err.kind(), err.to_string())
            }
        }
    }

    async fn run_review(&self, number: u32) -> Result<ReviewResult, WorkflowError> {
        let record = self.fetch_with_diffs(number).await?;

        let batches = BatchPlanner::new(self.options.limits).plan(&record.files);
        let total = batches.len();
        if total == 0 {
            return Err(WorkflowError::NoFiles { number });
        }
        self.report(ProgressEvent::BatchesPlanned { total });

        let mut responses = Vec::with_capacity(total);
        for (index, files) in batches.into_iter().enumerate() {
            let current = index + 1;
            if total > 1 {
                self.report(ProgressEvent::ReviewingBatch { current, total });
            }

            let request = WebhookRequest::new(
                RequestType::Review,
                &record,
                files,
                BatchInfo { current, total },
                self.options.review_context.clone(),
            );
            let response = match self.service.review(&request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(
                        change = number,
                        batch = current,
                        total = total,
                        error = %err,
                        "Batch failed, dropping"
                    );
                    self.report(ProgressEvent::Warning {
                        message: format!("Batch {current}/{total} failed: {err}"),
                    });
                    ReviewResponse::failed(err.to_string())
                }
            };
            responses.push(response);
        }

        self.report(ProgressEvent::MergingResults);
        let mut result = ReviewMerger::default().merge(&responses);
        result.success = true;

        info!(
            change = number,
            score = result.overall_score,
            comments = result.comments.len(),
            batches = total,
            failed = result.batches_failed,
            "Review complete"
        );
        Ok(result)
    }
}
