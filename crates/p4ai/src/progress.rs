// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Progress reporting for the workflows
//!
//! The callback may be invoked from any thread the workflow runs on; hosts
//! that render progress on a UI thread must marshal the event themselves.

use std::fmt;

/// Progress callback signature
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Progress event during a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Fetching the changelist summary
    FetchingChangelist {
        /// Change number
        number: u32,
    },
    /// Collecting per-file diffs
    CollectingDiffs {
        /// Files in the changelist
        files: usize,
    },
    /// Review batches planned
    BatchesPlanned {
        /// Number of batches
        total: usize,
    },
    /// Sending one review batch
    ReviewingBatch {
        /// 1-based batch index
        current: usize,
        /// Number of batches
        total: usize,
    },
    /// Combining batch results
    MergingResults,
    /// Waiting for the generated description
    GeneratingDescription,
    /// Writing the description back to the changelist
    ApplyingDescription,
    /// Non-fatal problem
    Warning {
        /// Description of the warning
        message: String,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingChangelist { number } => {
                write!(f, "Collecting changelist {number} information...")
            }
            Self::CollectingDiffs { files } => write!(f, "Collecting diffs for {files} files..."),
            Self::BatchesPlanned { total: 1 } => f.write_str("Running AI code review..."),
            Self::BatchesPlanned { total } => write!(f, "Reviewing in {total} batches..."),
            Self::ReviewingBatch { current, total } => {
                write!(f, "Reviewing batch {current}/{total}...")
            }
            Self::MergingResults => f.write_str("Processing review results..."),
            Self::GeneratingDescription => f.write_str("Generating AI description..."),
            Self::ApplyingDescription => f.write_str("Applying description..."),
            Self::Warning { message } => write!(f, "Warning: {message}"),
        }
    }
}
