// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Changelist types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a changelist does to a file, as reported by `p4 describe`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileAction {
    /// New file
    Add,
    /// Modified file
    Edit,
    /// Removed file
    Delete,
    /// File branched from another depot path
    Branch,
    /// Changes integrated from another depot path
    Integrate,
    /// Target side of a move/rename
    MoveAdd,
    /// Source side of a move/rename
    MoveDelete,
    /// Any other action word (`import`, `purge`, `archive`, ...)
    Other(String),
}

impl FileAction {
    /// The action word as `p4` prints it
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Branch => "branch",
            Self::Integrate => "integrate",
            Self::MoveAdd => "move/add",
            Self::MoveDelete => "move/delete",
            Self::Other(word) => word,
        }
    }

    /// Whether the file has no prior content in this change's view
    #[must_use]
    pub fn is_new_file(&self) -> bool {
        matches!(self, Self::Add | Self::Branch | Self::MoveAdd)
    }

    /// Whether the file is removed by the change
    #[must_use]
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Delete | Self::MoveDelete)
    }
}

impl From<&str> for FileAction {
    fn from(word: &str) -> Self {
        match word {
            "add" => Self::Add,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            "branch" => Self::Branch,
            "integrate" => Self::Integrate,
            "move/add" => Self::MoveAdd,
            "move/delete" => Self::MoveDelete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FileAction {
    fn from(word: String) -> Self {
        Self::from(word.as_str())
    }
}

impl From<FileAction> for String {
    fn from(action: FileAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changelist state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// Not yet submitted; files are open in a client workspace
    #[default]
    Pending,
    /// Committed to the depot
    Submitted,
}

impl ChangeStatus {
    /// The status word as `p4` prints it between asterisks
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
        }
    }
}

impl FromStr for ChangeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            other => Err(format!("unknown change status: {other}")),
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two diff bodies an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffVariant {
    /// Minimal context around each hunk
    Short,
    /// Very wide context, effectively the whole file
    Full,
}

/// One file's state within a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Depot path, unique within the owning change
    pub depot_path: String,
    /// Action applied to the file
    pub action: FileAction,
    /// Revision number (0 = unknown or head)
    pub revision: u32,
    /// Perforce file type, when a diff marker reported one
    #[serde(default)]
    pub file_type: String,
    /// Unified diff body with minimal context
    #[serde(default)]
    pub diff_short: String,
    /// Unified diff body with whole-file context
    #[serde(default)]
    pub diff_full: String,
    /// Content before the change, for consumers that want it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Content after the change, for consumers that want it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
}

impl FileChange {
    /// Create a file entry with identity fields only; diffs start empty
    #[must_use]
    pub fn new(depot_path: impl Into<String>, revision: u32, action: FileAction) -> Self {
        Self {
            depot_path: depot_path.into(),
            action,
            revision,
            file_type: String::new(),
            diff_short: String::new(),
            diff_full: String::new(),
            original_content: None,
            new_content: None,
        }
    }

    /// Borrow one of the diff bodies
    #[must_use]
    pub fn diff(&self, variant: DiffVariant) -> &str {
        match variant {
            DiffVariant::Short => &self.diff_short,
            DiffVariant::Full => &self.diff_full,
        }
    }

    /// Replace one of the diff bodies
    pub fn set_diff(&mut self, variant: DiffVariant, body: String) {
        match variant {
            DiffVariant::Short => self.diff_short = body,
            DiffVariant::Full => self.diff_full = body,
        }
    }

    /// Set both diff bodies to the same text
    pub fn set_both_diffs(&mut self, body: String) {
        self.diff_full.clone_from(&body);
        self.diff_short = body;
    }

    /// Number of newline-separated lines in the short diff (0 when empty)
    #[must_use]
    pub fn line_count(&self) -> usize {
        if self.diff_short.is_empty() {
            0
        } else {
            self.diff_short.split('\n').count()
        }
    }

    /// Last path segment of the depot path
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.depot_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.depot_path)
    }
}

/// One changelist as described by `p4 describe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Change number
    pub number: u32,
    /// Owner of the change
    pub user: String,
    /// Client workspace the change belongs to
    pub client: String,
    /// Pending or submitted
    pub status: ChangeStatus,
    /// Date from the describe header, when it could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    /// Change description (may be empty)
    pub description: String,
    /// Files in describe order
    pub files: Vec<FileChange>,
}

impl ChangeRecord {
    /// Create an empty record for the given change number
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self {
            number,
            user: String::new(),
            client: String::new(),
            status: ChangeStatus::Pending,
            date: None,
            description: String::new(),
            files: Vec::new(),
        }
    }

    /// Check if the change is still pending
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ChangeStatus::Pending
    }

    /// Index of the first file whose depot path is exactly `depot_path`
    #[must_use]
    pub fn file_index(&self, depot_path: &str) -> Option<usize> {
        self.files.iter().position(|f| f.depot_path == depot_path)
    }

    /// Append a file unless its depot path is already present
    ///
    /// Returns `false` if the file was a duplicate and was not added.
    pub fn push_file(&mut self, file: FileChange) -> bool {
        if self.file_index(&file.depot_path).is_some() {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Total short-diff lines across all files
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(FileChange::line_count).sum()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: line_count matches the number of '\n'-separated pieces
        #[test]
        fn prop_line_count_matches_split(lines in proptest::collection::vec("[^\n]{0,20}", 1..30)) {
            let mut file = FileChange::new("//depot/x", 1, FileAction::Edit);
            file.diff_short = lines.join("\n");
            let expected = if file.diff_short.is_empty() { 0 } else { lines.len() };
            prop_assert_eq!(file.line_count(), expected);
        }

        /// Property: push_file never leaves duplicate depot paths
        #[test]
        fn prop_push_file_unique(paths in proptest::collection::vec("//depot/[a-c]{1,2}", 0..20)) {
            let mut record = ChangeRecord::new(1);
            for path in &paths {
                record.push_file(FileChange::new(path.clone(), 1, FileAction::Edit));
            }
            let mut seen = std::collections::HashSet::new();
            for file in &record.files {
                prop_assert!(seen.insert(file.depot_path.clone()));
            }
        }
    }
}
