// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! HTTP client for the judgement webhook
//!
//! The webhook accepts a [`WebhookRequest`] as JSON and answers with a JSON
//! object carrying a `success` flag. [`JudgementService`] is the seam the
//! workflows call through; [`WebhookClient`] is the `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServiceError;
use crate::payload::{DescriptionResponse, ReviewResponse, WebhookRequest};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends requests to the judgement service
#[async_trait]
pub trait JudgementService: Send + Sync {
    /// POST `request` and return the decoded JSON body
    ///
    /// # Errors
    ///
    /// Returns a transport `ServiceError` if the call cannot complete.
    async fn post(&self, request: &WebhookRequest) -> Result<Value, ServiceError>;

    /// Send a review request and decode a successful response
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` on transport failure, a malformed response, or
    /// a response with `success: false`.
    async fn review(&self, request: &WebhookRequest) -> Result<ReviewResponse, ServiceError> {
        decode_response(self.post(request).await?)
    }

    /// Send a description request and decode a successful response
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` on transport failure, a malformed response, or
    /// a response with `success: false`.
    async fn describe(
        &self,
        request: &WebhookRequest,
    ) -> Result<DescriptionResponse, ServiceError> {
        decode_response(self.post(request).await?)
    }
}

/// Check the `success` envelope of a response body
///
/// # Errors
///
/// Returns `ServiceError::InvalidResponse` for a non-object body or a missing
/// `success` flag, and `ServiceError::Rejected` with the upstream `error`
/// text when `success` is false.
pub fn check_envelope(body: Value) -> Result<Map<String, Value>, ServiceError> {
    let Value::Object(map) = body else {
        return Err(ServiceError::InvalidResponse {
            message: "expected a JSON object".to_string(),
        });
    };

    match map.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(map),
        Some(false) => {
            let message = map
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("unknown error")
                .to_string();
            Err(ServiceError::Rejected { message })
        }
        None => Err(ServiceError::InvalidResponse {
            message: "missing success flag".to_string(),
        }),
    }
}

/// Validate the envelope and deserialize the body
///
/// # Errors
///
/// See [`check_envelope`]; also fails when the fields have the wrong types.
pub fn decode_response<T: DeserializeOwned>(body: Value) -> Result<T, ServiceError> {
    let map = check_envelope(body)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| ServiceError::InvalidResponse {
        message: e.to_string(),
    })
}

/// `reqwest`-backed [`JudgementService`]
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl WebhookClient {
    /// Create a client for `url`
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotConfigured` for an empty URL, or
    /// `ServiceError::Request` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ServiceError::NotConfigured);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url, timeout })
    }

    /// The webhook URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            ServiceError::Connection {
                message: err.to_string(),
            }
        } else {
            ServiceError::Request(err)
        }
    }
}

#[async_trait]
impl JudgementService for WebhookClient {
    async fn post(&self, request: &WebhookRequest) -> Result<Value, ServiceError> {
        debug!(
            url = %self.url,
            request_type = %request.request_type,
            batch = request.batch_info.current,
            total = request.batch_info.total,
            files = request.files.len(),
            "Posting to webhook"
        );

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use similar_asserts::assert_eq;

    #[test]
    fn test_envelope_rejects_non_object() {
        let err = check_envelope(json!([1, 2])).expect_err("array");
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_envelope_requires_success_flag() {
        let err = check_envelope(json!({"description": "x"})).expect_err("no flag");
        assert!(matches!(err, ServiceError::InvalidResponse { .. }));
        let err = check_envelope(json!({"success": "yes"})).expect_err("not a bool");
        assert!(matches!(err, ServiceError::InvalidResponse { .. }));
    }

    #[test]
    fn test_envelope_surfaces_upstream_error() {
        let err = check_envelope(json!({"success": false, "error": "quota exceeded"}))
            .expect_err("rejected");
        assert_eq!(err.to_string(), "quota exceeded");
        let err = check_envelope(json!({"success": false})).expect_err("rejected");
        assert_eq!(err.to_string(), "unknown error");
    }

    #[test]
    fn test_decode_review() {
        let response: ReviewResponse = decode_response(json!({
            "success": true,
            "overall_score": 72,
            "summary": "ok",
            "comments": [{"file_path": "//depot/a.c", "line_number": 4, "severity": "critical",
                          "category": "bug", "message": "leak", "suggestion": "free it"}],
            "statistics": {"critical": 1, "warning": 0, "info": 0, "suggestion": 0}
        }))
        .expect("decode");
        assert_eq!(response.overall_score, 72);
        assert_eq!(response.comments[0].suggestion.as_deref(), Some("free it"));
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let err = decode_response::<ReviewResponse>(json!({"success": true, "comments": "none"}))
            .expect_err("bad comments");
        assert!(matches!(err, ServiceError::InvalidResponse { .. }));
    }

    #[test]
    fn test_empty_url_is_not_configured() {
        let err = WebhookClient::new("  ", DEFAULT_TIMEOUT).expect_err("empty url");
        assert!(matches!(err, ServiceError::NotConfigured));
    }
}
