// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Shared workflow plumbing
//!
//! A [`Workflow`] owns a `p4` client and a judgement service and runs one
//! request at a time: fetch the changelist, collect its diffs, then either
//! generate a description ([`crate::description`]) or review it in batches
//! ([`crate::review`]). Every external call is awaited in sequence.

use p4ai_perforce::{ChangeRecord, ContextWidths, DiffAcquirer, P4Client, P4Runner};
use p4ai_review::{BatchLimits, JudgementService, RequestType};
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::progress::{ProgressCallback, ProgressEvent};
use crate::settings::Settings;

/// Tunables for a workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Diff context widths
    pub widths: ContextWidths,
    /// Review batch limits
    pub limits: BatchLimits,
    /// `expert_context` for description requests
    pub description_context: String,
    /// `expert_context` for review requests
    pub review_context: String,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for WorkflowOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            widths: settings.context_widths(),
            limits: settings.batch_limits(),
            description_context: settings.expert_context(RequestType::Description),
            review_context: settings.expert_context(RequestType::Review),
        }
    }
}

/// Runs description and review requests for changelists
pub struct Workflow<R, S> {
    pub(crate) client: P4Client<R>,
    pub(crate) service: S,
    pub(crate) options: WorkflowOptions,
    progress: Option<ProgressCallback>,
}

impl<R: P4Runner, S: JudgementService> Workflow<R, S> {
    /// Create a workflow with default options
    #[must_use]
    pub fn new(client: P4Client<R>, service: S) -> Self {
        Self {
            client,
            service,
            options: WorkflowOptions::default(),
            progress: None,
        }
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: WorkflowOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a progress callback
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The `p4` client
    #[must_use]
    pub fn client(&self) -> &P4Client<R> {
        &self.client
    }

    /// The judgement service
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Report progress event
    pub(crate) fn report(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress {
            callback(&event);
        }
    }

    /// Fetch a changelist and fill in its diffs
    ///
    /// Fails only when the summary cannot be fetched or lists no files;
    /// per-file diff failures become placeholders and progress warnings.
    pub(crate) async fn fetch_with_diffs(&self, number: u32) -> Result<ChangeRecord, WorkflowError> {
        self.report(ProgressEvent::FetchingChangelist { number });
        let mut record = self.client.fetch_change(number).await?;
        if record.files.is_empty() {
            return Err(WorkflowError::NoFiles { number });
        }

        self.report(ProgressEvent::CollectingDiffs {
            files: record.files.len(),
        });
        let report = DiffAcquirer::new(&self.client)
            .with_widths(self.options.widths)
            .collect(&mut record)
            .await;

        for path in &report.failed {
            self.report(ProgressEvent::Warning {
                message: format!("Diff unavailable for {path}"),
            });
        }
        if report.unmatched_bodies > 0 {
            warn!(
                change = number,
                unmatched = report.unmatched_bodies,
                "Diff output named files outside the changelist"
            );
        }

        info!(
            change = number,
            status = %record.status,
            files = record.files.len(),
            lines = record.total_lines(),
            "Changelist ready"
        );
        Ok(record)
    }
}
