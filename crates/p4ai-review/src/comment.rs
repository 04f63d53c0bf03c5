// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Review result types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// How serious a review finding is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Must be fixed before submitting
    Critical,
    /// Likely problem
    Warning,
    /// Worth knowing
    #[default]
    Info,
    /// Optional improvement
    Suggestion,
}

impl Severity {
    /// All severities in reporting order
    pub const ALL: [Self; 4] = [Self::Critical, Self::Warning, Self::Info, Self::Suggestion];

    /// Lowercase name as used on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Suggestion => "suggestion",
        }
    }
}

/// Unknown severity words fall back to `info`
impl From<&str> for Severity {
    fn from(word: &str) -> Self {
        match word.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "warning" => Self::Warning,
            "suggestion" => Self::Suggestion,
            _ => Self::Info,
        }
    }
}

impl From<String> for Severity {
    fn from(word: String) -> Self {
        Self::from(word.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding produced by the review service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewComment {
    /// Depot path the finding refers to
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub file_path: String,
    /// Line in the new file (0 = whole file)
    #[serde(deserialize_with = "crate::de::loose_u32")]
    pub line_number: u32,
    /// Severity of the finding
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub severity: Severity,
    /// Short label such as `bug`, `security` or `style`
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub category: String,
    /// The finding itself
    #[serde(deserialize_with = "crate::de::null_as_default")]
    pub message: String,
    /// Proposed fix, if the service offered one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Number of comments per severity; every severity is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    /// Critical findings
    #[serde(deserialize_with = "crate::de::loose_u32")]
    pub critical: u32,
    /// Warnings
    #[serde(deserialize_with = "crate::de::loose_u32")]
    pub warning: u32,
    /// Informational findings
    #[serde(deserialize_with = "crate::de::loose_u32")]
    pub info: u32,
    /// Suggestions
    #[serde(deserialize_with = "crate::de::loose_u32")]
    pub suggestion: u32,
}

impl SeverityCounts {
    /// Count `comments` by severity
    #[must_use]
    pub fn tally(comments: &[ReviewComment]) -> Self {
        let mut counts = Self::default();
        for comment in comments {
            counts.increment(comment.severity);
        }
        counts
    }

    /// Count for one severity
    #[must_use]
    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
            Severity::Suggestion => self.suggestion,
        }
    }

    /// Add one to a severity's count
    pub fn increment(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::Warning => &mut self.warning,
            Severity::Info => &mut self.info,
            Severity::Suggestion => &mut self.suggestion,
        };
        *slot += 1;
    }

    /// Sum over all severities
    #[must_use]
    pub fn total(&self) -> u32 {
        Severity::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Aggregate judgement for one changelist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Whether the review ran to completion
    pub success: bool,
    /// Combined summary text
    pub summary: String,
    /// Average score over successful batches, 0-100
    pub overall_score: u32,
    /// Findings, in batch order then response order
    pub comments: Vec<ReviewComment>,
    /// Findings per severity
    pub statistics: SeverityCounts,
    /// Human-readable error, only when `success` is false
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Classification of `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Batches sent to the service
    #[serde(default)]
    pub batches_total: usize,
    /// Batches that failed and contributed nothing
    #[serde(default)]
    pub batches_failed: usize,
}

impl ReviewResult {
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

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn comment(severity: Severity) -> ReviewComment {
        ReviewComment {
            file_path: "//depot/a.c".into(),
            line_number: 3,
            severity,
            category: "bug".into(),
            message: "m".into(),
            suggestion: None,
        }
    }

    #[test]
    fn test_severity_parsing_is_lenient() {
        assert_eq!(Severity::from("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from(" warning "), Severity::Warning);
        assert_eq!(Severity::from("blocker"), Severity::Info);
        assert_eq!(Severity::from(""), Severity::Info);
    }

    #[test]
    fn test_comment_deserializes_with_defaults() {
        let comment: ReviewComment =
            serde_json::from_str(r#"{"file_path":"//depot/a.c","severity":"warning","message":"x"}"#)
                .expect("deserialize");
        assert_eq!(comment.line_number, 0);
        assert_eq!(comment.severity, Severity::Warning);
        assert_eq!(comment.category, "");
        assert_eq!(comment.suggestion, None);
    }

    #[test]
    fn test_tally() {
        let comments = vec![
            comment(Severity::Critical),
            comment(Severity::Info),
            comment(Severity::Info),
        ];
        let counts = SeverityCounts::tally(&comments);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.warning, 0);
        assert_eq!(counts.info, 2);
        assert_eq!(counts.suggestion, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_statistics_always_serialize_every_severity() {
        let json = serde_json::to_value(SeverityCounts::default()).expect("serialize");
        for severity in Severity::ALL {
            assert_eq!(json[severity.as_str()], 0);
        }
    }

    #[test]
    fn test_failure_result() {
        let result = ReviewResult::failure(ErrorKind::Content, "No files changed");
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Content));
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["error_kind"], "content");
    }
}
