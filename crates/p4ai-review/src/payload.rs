// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Webhook request and response bodies

use std::fmt;

use p4ai_perforce::{ChangeRecord, FileChange};
use serde::{Deserialize, Serialize};

use crate::comment::{ReviewComment, SeverityCounts};

/// What the service is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Write a changelist description
    Description,
    /// Review the changed code
    Review,
}

impl RequestType {
    /// Wire name of the request type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changelist identity sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelistInfo {
    /// Change number
    pub number: u32,
    /// Owner
    pub user: String,
    /// Client workspace
    pub client: String,
    /// Description as it currently stands
    pub current_description: String,
}

impl From<&ChangeRecord> for ChangelistInfo {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            number: record.number,
            user: record.user.clone(),
            client: record.client.clone(),
            current_description: record.description.clone(),
        }
    }
}

/// One file of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Depot path
    pub depot_path: String,
    /// Action word (`edit`, `move/add`, ...)
    pub action: String,
    /// Perforce file type, empty when unknown
    pub file_type: String,
    /// Revision (0 = unknown)
    pub revision: u32,
    /// Short-context unified diff
    pub diff: String,
}

impl From<&FileChange> for FilePayload {
    fn from(file: &FileChange) -> Self {
        Self {
            depot_path: file.depot_path.clone(),
            action: file.action.to_string(),
            file_type: file.file_type.clone(),
            revision: file.revision,
            diff: file.diff_short.clone(),
        }
    }
}

/// Position of a batch within its request sequence (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// This batch
    pub current: usize,
    /// Number of batches
    pub total: usize,
}

impl BatchInfo {
    /// The only batch of a single-request sequence
    pub const SINGLE: Self = Self {
        current: 1,
        total: 1,
    };
}

/// Body POSTed to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequest {
    /// Description or review
    pub request_type: RequestType,
    /// Changelist identity
    pub changelist: ChangelistInfo,
    /// Files of this batch
    pub files: Vec<FilePayload>,
    /// Batch position
    pub batch_info: BatchInfo,
    /// Lets the service correlate batches of one changelist: `cl_<number>`
    pub session_key: String,
    /// Extra system-prompt text for the service
    pub expert_context: String,
}

impl WebhookRequest {
    /// Build a request for `files` of `record`
    #[must_use]
    pub fn new(
        request_type: RequestType,
        record: &ChangeRecord,
        files: &[FileChange],
        batch_info: BatchInfo,
        expert_context: impl Into<String>,
    ) -> Self {
        Self {
            request_type,
            changelist: ChangelistInfo::from(record),
            files: files.iter().map(FilePayload::from).collect(),
            batch_info,
            session_key: format!("cl_{}", record.number),
            expert_context: expert_context.into(),
        }
    }
}

/// Response to a review request
///
/// Missing or `null` fields take their defaults; `overall_score` also
/// accepts floats (floored) and numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewResponse {
    /// Whether the service handled the batch
    pub success: bool,
    /// Batch score, nominally 0-100
    #[serde(deserialize_with = "crate::de::loose_int")]
    pub overall_score: i64,
    /// Batch summary
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub summary: String,
    /// Findings for this batch
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub comments: Vec<ReviewComment>,
    /// Per-severity counts as reported by the service
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub statistics: SeverityCounts,
    /// Failure message when `success` is false
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub error: String,
}

impl ReviewResponse {
    /// A failed batch, for calls that produced no usable response
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }
}

/// Response to a description request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionResponse {
    /// Whether the service handled the request
    pub success: bool,
    /// Generated description
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub description: String,
    /// One-line summary of the change
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub summary: String,
    /// Failure message when `success` is false
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub error: String,
}
