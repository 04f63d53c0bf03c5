// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Splitting a changelist's files into request batches
//!
//! Batches are contiguous, in file order, and bounded by both a file count
//! and a diff line count. A file that alone exceeds the line limit still gets
//! a batch of its own.
//!
//! # Example
//!
//! ```
//! use p4ai_perforce::{FileAction, FileChange};
//! use p4ai_review::batch::{BatchLimits, BatchPlanner};
//!
//! let files: Vec<FileChange> = (0..25)
//!     .map(|i| FileChange::new(format!("//depot/f{i}.c"), 1, FileAction::Edit))
//!     .collect();
//! let batches = BatchPlanner::new(BatchLimits::default()).plan(&files);
//! let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
//! assert_eq!(sizes, vec![10, 10, 5]);
//! ```

use p4ai_perforce::FileChange;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default maximum number of files per batch
pub const DEFAULT_MAX_FILES: usize = 10;

/// Default maximum number of short-diff lines per batch
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Size ceilings for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLimits {
    /// Maximum files per batch
    pub max_files: usize,
    /// Maximum short-diff lines per batch
    pub max_lines: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Greedy, order-preserving batch splitter
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchPlanner {
    limits: BatchLimits,
}

impl BatchPlanner {
    /// Create a planner with the given limits
    #[must_use]
    pub fn new(limits: BatchLimits) -> Self {
        Self { limits }
    }

    /// The limits this planner enforces
    #[must_use]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Split `files` into contiguous batches
    ///
    /// Concatenating the returned slices reproduces `files` exactly. An empty
    /// input yields no batches.
    #[must_use]
    pub fn plan<'a>(&self, files: &'a [FileChange]) -> Vec<&'a [FileChange]> {
        if files.is_empty() {
            return Vec::new();
        }

        let total_lines: usize = files.iter().map(FileChange::line_count).sum();
        if files.len() <= self.limits.max_files && total_lines <= self.limits.max_lines {
            return vec![files];
        }

        let mut batches = Vec::new();
        let mut start = 0;
        let mut lines = 0;

        for (index, file) in files.iter().enumerate() {
            let file_lines = file.line_count();
            let size = index - start;
            let over_files = size + 1 > self.limits.max_files;
            let over_lines = lines + file_lines > self.limits.max_lines;

            if size > 0 && (over_files || over_lines) {
                batches.push(&files[start..index]);
                start = index;
                lines = 0;
            }
            lines += file_lines;
        }
        batches.push(&files[start..]);

        debug!(
            files = files.len(),
            lines = total_lines,
            batches = batches.len(),
            "Planned batches"
        );
        batches
    }
}
