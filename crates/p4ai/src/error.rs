// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Workflow errors

use p4ai_perforce::P4Error;
use p4ai_review::{ErrorKind, ServiceError};
use thiserror::Error;

/// Errors that end a workflow
///
/// Workflows never return these directly; they are folded into the result
/// as `error` and `error_kind`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A `p4` call failed
    #[error("Perforce error: {0}")]
    Perforce(#[from] P4Error),

    /// The AI service call failed
    #[error("AI service error: {0}")]
    Service(#[from] ServiceError),

    /// The changelist has no files
    #[error("No files changed in changelist {number}")]
    NoFiles {
        /// Change number
        number: u32,
    },

    /// The service answered but produced no description
    #[error("The AI service did not generate a description")]
    EmptyDescription,
}

impl WorkflowError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Perforce(err) if err.is_transport() => ErrorKind::Transport,
            Self::Perforce(_) => ErrorKind::Protocol,
            Self::Service(err) => err.kind(),
            Self::NoFiles { .. } | Self::EmptyDescription => ErrorKind::Content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_kinds() {
        let missing = WorkflowError::from(P4Error::NotInstalled {
            program: "p4".into(),
        });
        assert_eq!(missing.kind(), ErrorKind::Transport);

        let failed = WorkflowError::from(P4Error::CommandFailed {
            command: "describe -s 1".into(),
            stderr: "no such changelist".into(),
        });
        assert_eq!(failed.kind(), ErrorKind::Protocol);

        let rejected = WorkflowError::from(ServiceError::Rejected {
            message: "quota".into(),
        });
        assert_eq!(rejected.kind(), ErrorKind::Protocol);

        assert_eq!(WorkflowError::NoFiles { number: 3 }.kind(), ErrorKind::Content);
    }

    #[test]
    fn test_messages_name_the_source() {
        let err = WorkflowError::from(ServiceError::Timeout { secs: 60 });
        assert_eq!(err.to_string(), "AI service error: Request timed out after 60s");
        assert_eq!(
            WorkflowError::NoFiles { number: 7 }.to_string(),
            "No files changed in changelist 7"
        );
    }
}
