// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! p4ai-review: batching, webhook exchange and result merging for p4ai
//!
//! This library crate takes a changelist whose diffs have been collected,
//! splits its files into size-bounded batches, builds the webhook payloads,
//! and folds the independent batch responses into one [`ReviewResult`].
//!
//! # Example
//!
//! ```
//! use p4ai_review::prelude::*;
//!
//! let responses = vec![
//!     ReviewResponse { success: true, overall_score: 80, ..Default::default() },
//!     ReviewResponse::failed("timed out"),
//!     ReviewResponse { success: true, overall_score: 60, ..Default::default() },
//! ];
//! let result = ReviewMerger::default().merge(&responses);
//! assert_eq!(result.overall_score, 70);
//! assert_eq!(result.summary, "review complete");
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod comment;
mod de;
pub mod error;
pub mod merge;
pub mod payload;
pub mod profile;
pub mod webhook;

pub use batch::{BatchLimits, BatchPlanner};
pub use comment::{ReviewComment, ReviewResult, Severity, SeverityCounts};
pub use error::{ErrorKind, ServiceError};
pub use merge::ReviewMerger;
pub use payload::{
    BatchInfo, ChangelistInfo, DescriptionResponse, FilePayload, RequestType, ReviewResponse,
    WebhookRequest,
};
pub use profile::ExpertProfile;
pub use webhook::{JudgementService, WebhookClient};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::{BatchLimits, BatchPlanner};
    pub use crate::comment::{ReviewComment, ReviewResult, Severity, SeverityCounts};
    pub use crate::error::{ErrorKind, ServiceError};
    pub use crate::merge::ReviewMerger;
    pub use crate::payload::{BatchInfo, RequestType, ReviewResponse, WebhookRequest};
    pub use crate::profile::ExpertProfile;
    pub use crate::webhook::{JudgementService, WebhookClient};
}
