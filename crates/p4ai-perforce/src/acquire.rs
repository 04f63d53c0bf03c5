// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-file diff collection
//!
//! [`DiffAcquirer::collect`] fills `diff_short` and `diff_full` for every file
//! of a [`ChangeRecord`], choosing a strategy from the change status and the
//! file action:
//!
//! | status    | action                  | source                                  |
//! |-----------|-------------------------|-----------------------------------------|
//! | submitted | any                     | two bulk `p4 describe -du<W>` calls     |
//! | pending   | add, branch, move/add   | synthetic all-added diff of the content |
//! | pending   | delete, move/delete     | fixed deletion placeholder              |
//! | pending   | anything else           | two `p4 diff -du<W> <path>` calls       |
//!
//! Collection is best effort: a file whose diff cannot be fetched gets a
//! failure placeholder in both fields and the next file is processed.

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::change::{ChangeRecord, ChangeStatus, DiffVariant};
use crate::client::{P4Client, P4Runner};
use crate::error::P4Error;
use crate::parser::{extract_single_diff, parse_diff_dump};

/// Diff text used for files the change deletes
pub const DELETED_PLACEHOLDER: &str = "[file deleted: no content to diff]";

/// Diff text used for new files whose content could not be read
pub const CONTENT_UNAVAILABLE: &str = "[content unavailable]";

/// Prefix of the diff text stored when fetching a file's diff failed
pub const FAILURE_MARKER: &str = "[diff unavailable";

/// Longest error excerpt embedded in a failure placeholder, in characters
const FAILURE_DETAIL_CHARS: usize = 100;

/// Build the placeholder stored in both diff fields when a fetch failed
#[must_use]
pub fn failure_placeholder(err: &impl Display) -> String {
    let detail: String = err.to_string().chars().take(FAILURE_DETAIL_CHARS).collect();
    format!("{FAILURE_MARKER}: {detail}]")
}

/// Unified diff that adds every line of `content` to an empty file
#[must_use]
pub fn synthetic_add_diff(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut diff = format!("@@ -0,0 +1,{} @@", lines.len());
    for line in lines {
        diff.push_str("\n+");
        diff.push_str(line);
    }
    diff
}

/// Unified-diff context widths for the two diff variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWidths {
    /// Context lines for `diff_short`
    pub short: u32,
    /// Context lines for `diff_full`
    pub full: u32,
}

impl Default for ContextWidths {
    fn default() -> Self {
        Self {
            short: 3,
            full: 999_999,
        }
    }
}

impl ContextWidths {
    fn width(self, variant: DiffVariant) -> u32 {
        match variant {
            DiffVariant::Short => self.short,
            DiffVariant::Full => self.full,
        }
    }
}

/// Outcome of a [`DiffAcquirer::collect`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquireReport {
    /// Files whose diffs were collected
    pub collected: usize,
    /// Depot paths that got a failure placeholder
    pub failed: Vec<String>,
    /// Diff bodies in bulk output that named no file of the change
    pub unmatched_bodies: usize,
}

/// Fills in the diff fields of a parsed changelist
pub struct DiffAcquirer<'a, R> {
    client: &'a P4Client<R>,
    widths: ContextWidths,
}

impl<'a, R: P4Runner> DiffAcquirer<'a, R> {
    /// Create an acquirer with default context widths
    #[must_use]
    pub fn new(client: &'a P4Client<R>) -> Self {
        Self {
            client,
            widths: ContextWidths::default(),
        }
    }

    /// Override the context widths
    #[must_use]
    pub fn with_widths(mut self, widths: ContextWidths) -> Self {
        self.widths = widths;
        self
    }

    /// Fill `diff_short` / `diff_full` for every file of `record`
    ///
    /// Never fails; per-file problems are recorded in the returned report and
    /// as placeholder diff text.
    pub async fn collect(&self, record: &mut ChangeRecord) -> AcquireReport {
        let report = match record.status {
            ChangeStatus::Submitted => self.collect_submitted(record).await,
            ChangeStatus::Pending => self.collect_pending(record).await,
        };
        info!(
            change = record.number,
            collected = report.collected,
            failed = report.failed.len(),
            unmatched = report.unmatched_bodies,
            "Collected diffs"
        );
        report
    }

    async fn collect_submitted(&self, record: &mut ChangeRecord) -> AcquireReport {
        let mut report = AcquireReport::default();

        for variant in [DiffVariant::Short, DiffVariant::Full] {
            match self
                .client
                .describe_diff(record.number, self.widths.width(variant))
                .await
            {
                Ok(text) => {
                    let stats = parse_diff_dump(&text, record, variant);
                    report.unmatched_bodies += stats.unmatched;
                }
                Err(err) if variant == DiffVariant::Short => {
                    warn!(change = record.number, error = %err, "Bulk describe failed");
                    let placeholder = failure_placeholder(&err);
                    for file in &mut record.files {
                        file.set_both_diffs(placeholder.clone());
                        report.failed.push(file.depot_path.clone());
                    }
                    return report;
                }
                Err(err) => {
                    // Wide-context output is optional; short bodies stand in for it
                    warn!(
                        change = record.number,
                        error = %err,
                        "Wide-context describe failed, reusing short diffs"
                    );
                }
            }
        }

        for file in &mut record.files {
            if file.diff_full.is_empty() && !file.diff_short.is_empty() {
                file.diff_full.clone_from(&file.diff_short);
            } else if file.diff_short.is_empty() && !file.diff_full.is_empty() {
                file.diff_short.clone_from(&file.diff_full);
            }
            report.collected += 1;
        }
        report
    }

    async fn collect_pending(&self, record: &mut ChangeRecord) -> AcquireReport {
        let mut report = AcquireReport::default();
        let change = record.number;

        for index in 0..record.files.len() {
            let path = record.files[index].depot_path.clone();
            let action = record.files[index].action.clone();
            debug!(depot_path = %path, action = %action, "Collecting diff");

            if action.is_new_file() {
                let content = self.new_file_content(&path, change).await;
                let file = &mut record.files[index];
                match content {
                    Some(content) => {
                        file.set_both_diffs(synthetic_add_diff(&content));
                        file.new_content = Some(content);
                    }
                    None => file.set_both_diffs(CONTENT_UNAVAILABLE.to_string()),
                }
                report.collected += 1;
                continue;
            }

            if action.is_removal() {
                record.files[index].set_both_diffs(DELETED_PLACEHOLDER.to_string());
                report.collected += 1;
                continue;
            }

            match self.workspace_diffs(&path).await {
                Ok((short, full)) => {
                    let file = &mut record.files[index];
                    file.diff_short = short;
                    file.diff_full = full;
                    report.collected += 1;
                }
                Err(err) => {
                    warn!(depot_path = %path, error = %err, "Diff failed, storing placeholder");
                    record.files[index].set_both_diffs(failure_placeholder(&err));
                    report.failed.push(path.clone());
                }
            }

            if record.files[index].revision == 0 {
                match self.client.have_revision(&path).await {
                    Ok(Some(revision)) => record.files[index].revision = revision,
                    Ok(None) => {}
                    Err(err) => debug!(depot_path = %path, error = %err, "have failed"),
                }
            }
        }
        report
    }

    /// Short and full diffs of a file opened for edit in the workspace
    async fn workspace_diffs(&self, depot_path: &str) -> Result<(String, String), P4Error> {
        let short = self.client.diff_file(depot_path, self.widths.short).await?;
        let full = self.client.diff_file(depot_path, self.widths.full).await?;
        let mut short = extract_single_diff(&short);
        let mut full = extract_single_diff(&full);
        if full.is_empty() {
            full.clone_from(&short);
        } else if short.is_empty() {
            short.clone_from(&full);
        }
        Ok((short, full))
    }

    /// Content of a newly added file: shelved copy first, then the workspace
    async fn new_file_content(&self, depot_path: &str, change: u32) -> Option<String> {
        match self.client.print_shelved(depot_path, change).await {
            Ok(content) if !content.is_empty() => return Some(content),
            Ok(_) => debug!(depot_path = %depot_path, "Shelved content empty"),
            Err(err) => debug!(depot_path = %depot_path, error = %err, "No shelved content"),
        }

        let local = match self.client.where_local(depot_path).await {
            Ok(local) => local,
            Err(err) => {
                debug!(depot_path = %depot_path, error = %err, "Could not resolve workspace path");
                return None;
            }
        };

        match tokio::fs::read(&local).await {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                debug!(path = %local.display(), error = %err, "Could not read workspace file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_synthetic_add_diff_three_lines() {
        let diff = synthetic_add_diff("one\ntwo\nthree\n");
        assert_eq!(diff, "@@ -0,0 +1,3 @@\n+one\n+two\n+three");
        let lines: Vec<&str> = diff.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1..].iter().all(|l| l.starts_with('+')));
    }

    #[test]
    fn test_synthetic_add_diff_empty_file() {
        assert_eq!(synthetic_add_diff(""), "@@ -0,0 +1,0 @@");
    }

    #[test]
    fn test_failure_placeholder_truncates() {
        let long = "x".repeat(500);
        let placeholder = failure_placeholder(&long);
        assert!(placeholder.starts_with(FAILURE_MARKER));
        assert_eq!(placeholder.chars().filter(|c| *c == 'x').count(), 100);
    }

    #[test]
    fn test_failure_placeholder_multibyte() {
        let placeholder = failure_placeholder(&"변경".repeat(80));
        assert_eq!(placeholder.chars().filter(|c| *c == '변').count(), 50);
    }

    #[test]
    fn test_context_widths_default() {
        let widths = ContextWidths::default();
        assert_eq!(widths.width(DiffVariant::Short), 3);
        assert_eq!(widths.width(DiffVariant::Full), 999_999);
    }
}
