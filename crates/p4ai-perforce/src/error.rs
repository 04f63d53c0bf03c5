// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for p4ai-perforce

use thiserror::Error;

/// Errors that can occur while talking to the `p4` command-line client
#[derive(Debug, Error)]
pub enum P4Error {
    /// The `p4` executable could not be started
    #[error("p4 executable not found: {program}. Check that the Perforce CLI is installed and on PATH")]
    NotInstalled {
        /// The program name or path that was invoked
        program: String,
    },

    /// `p4` exited with a non-zero status and wrote to stderr
    #[error("p4 {command} failed: {stderr}")]
    CommandFailed {
        /// The subcommand and arguments that were run
        command: String,
        /// Trimmed stderr output
        stderr: String,
    },

    /// `p4` did not finish within the configured timeout
    #[error("p4 {command} timed out after {secs}s")]
    Timeout {
        /// The subcommand and arguments that were run
        command: String,
        /// Timeout that elapsed, in seconds
        secs: u64,
    },

    /// A depot path could not be mapped into the client workspace
    #[error("Depot path is not mapped in the client workspace: {depot_path}")]
    Unmapped {
        /// The depot path that `p4 where` could not resolve
        depot_path: String,
    },

    /// `p4 change -o` returned a form without a Description field
    #[error("Change form for {number} has no Description field")]
    MalformedForm {
        /// Change number whose form was requested
        number: u32,
    },

    /// IO error while spawning `p4` or reading a workspace file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl P4Error {
    /// Whether the failure is about reaching `p4` at all, rather than `p4`
    /// reporting a problem with the request
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled { .. } | Self::Timeout { .. } | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(
            P4Error::NotInstalled {
                program: "p4".into()
            }
            .is_transport()
        );
        assert!(
            P4Error::Timeout {
                command: "describe -s 1".into(),
                secs: 5
            }
            .is_transport()
        );
        assert!(
            !P4Error::CommandFailed {
                command: "describe -s 1".into(),
                stderr: "no such changelist".into()
            }
            .is_transport()
        );
    }

    #[test]
    fn test_command_failed_message() {
        let err = P4Error::CommandFailed {
            command: "describe -s 42".into(),
            stderr: "Change 42 unknown.".into(),
        };
        assert_eq!(err.to_string(), "p4 describe -s 42 failed: Change 42 unknown.");
    }
}
