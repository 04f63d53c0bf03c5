// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Description generation
//!
//! Sends the whole changelist in a single request; no batching. When asked
//! to, the generated text is written back with `p4 change -i`.

use p4ai_perforce::P4Runner;
use p4ai_review::{BatchInfo, ErrorKind, JudgementService, RequestType, WebhookRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::progress::ProgressEvent;
use crate::workflow::Workflow;

/// Outcome of a description request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionResult {
    /// Whether a description was generated (and applied, if requested)
    pub success: bool,
    /// Generated description
    pub description: String,
    /// One-line summary from the service
    pub summary: String,
    /// Whether the description was written to the changelist
    pub applied: bool,
    /// Human-readable error, only when `success` is false
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Classification of `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl DescriptionResult {
    /// A failed result carrying an error message
    #[must_use]
    pub fn failure(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_kind: Some(kind),
            ..Self::default()
        }
    }
}

impl<R: P4Runner, S: JudgementService> Workflow<R, S> {
    /// Generate a description for changelist `number`
    ///
    /// With `apply`, the description replaces the changelist's current one.
    /// Never fails: errors are reported in the result. If generation
    /// succeeded but applying failed, the generated text is still returned.
    pub async fn generate_description(&self, number: u32, apply: bool) -> DescriptionResult {
        let mut result = DescriptionResult::default();
        if let Err(err) = self.run_description(number, apply, &mut result).await {
            warn!(change = number, error = %err, "Description request failed");
            result.error = err.to_string();
            result.error_kind = Some(err.kind());
        }
        result
    }

    async fn run_description(
        &self,
        number: u32,
        apply: bool,
        result: &mut DescriptionResult,
    ) -> Result<(), WorkflowError> {
        let record = self.fetch_with_diffs(number).await?;

        self.report(ProgressEvent::GeneratingDescription);
        let request = WebhookRequest::new(
            RequestType::Description,
            &record,
            &record.files,
            BatchInfo::SINGLE,
            self.options.description_context.clone(),
        );
        let response = self.service.describe(&request).await?;

        let description = response.description.trim();
        if description.is_empty() {
            return Err(WorkflowError::EmptyDescription);
        }
        result.description = description.to_string();
        result.summary = response.summary;

        if apply {
            self.report(ProgressEvent::ApplyingDescription);
            self.client
                .update_description(number, &result.description)
                .await?;
            result.applied = true;
        }

        info!(change = number, applied = result.applied, "Description generated");
        result.success = true;
        Ok(())
    }
}
