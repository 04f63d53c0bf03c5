// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for p4ai-review

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failure, for choosing user guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The `p4` client or the webhook could not be reached
    Transport,
    /// A response was structurally wrong or reported failure
    Protocol,
    /// Nothing to work on, or the service produced nothing usable
    Content,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Content => "content",
        })
    }
}

/// Errors that can occur while talking to the judgement webhook
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No webhook URL configured
    #[error("Webhook URL is not configured")]
    NotConfigured,

    /// The webhook did not answer within the timeout
    #[error("Request timed out after {secs}s")]
    Timeout {
        /// Timeout that elapsed, in seconds
        secs: u64,
    },

    /// The webhook could not be reached at all
    #[error("Could not connect to the webhook: {message}")]
    Connection {
        /// Underlying connection error
        message: String,
    },

    /// The webhook answered with a non-2xx status
    #[error("HTTP error: {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// The response body was not JSON
    #[error("Could not parse the response as JSON: {message}")]
    Decode {
        /// Decoder error
        message: String,
    },

    /// The response JSON had the wrong shape
    #[error("Invalid response format: {message}")]
    InvalidResponse {
        /// What was wrong with the response
        message: String,
    },

    /// The service answered `success: false`
    #[error("{message}")]
    Rejected {
        /// Upstream error message
        message: String,
    },

    /// Any other request failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ServiceError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidResponse { .. } | Self::Rejected { .. } => ErrorKind::Protocol,
            Self::NotConfigured
            | Self::Timeout { .. }
            | Self::Connection { .. }
            | Self::Http { .. }
            | Self::Decode { .. }
            | Self::Request(_) => ErrorKind::Transport,
        }
    }
}
