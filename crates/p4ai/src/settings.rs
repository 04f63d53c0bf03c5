// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Persisted settings
//!
//! Settings live in a small JSON file. Every key has a default, so a missing
//! file, a missing key or a file that fails to parse all yield usable
//! settings.

use std::path::Path;
use std::time::Duration;

use p4ai_perforce::ContextWidths;
use p4ai_review::batch::{DEFAULT_MAX_FILES, DEFAULT_MAX_LINES};
use p4ai_review::{BatchLimits, ExpertProfile, RequestType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Every key accepted by [`Settings::set`]
pub const KEYS: [&str; 10] = [
    "webhook_url",
    "timeout",
    "expert_profile",
    "custom_prompts.description",
    "custom_prompts.review",
    "max_files_per_batch",
    "max_lines_per_batch",
    "short_context",
    "full_context",
    "p4_timeout",
];

/// Errors from reading, writing or editing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Key is not one of [`KEYS`]
    #[error("Unknown settings key: {key}")]
    UnknownKey {
        /// The rejected key
        key: String,
    },

    /// Value does not fit the key
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Key being set
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Settings file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Custom prompt text per request type; blank means "use the profile"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomPrompts {
    /// Replaces the profile's description prompt
    pub description: String,
    /// Replaces the profile's review prompt
    pub review: String,
}

impl CustomPrompts {
    /// Custom text for a request type, if one is set
    #[must_use]
    pub fn get(&self, request_type: RequestType) -> Option<&str> {
        let prompt = match request_type {
            RequestType::Description => &self.description,
            RequestType::Review => &self.review,
        };
        Some(prompt.as_str()).filter(|p| !p.trim().is_empty())
    }
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Webhook URL of the AI service
    pub webhook_url: String,
    /// Webhook timeout, seconds
    pub timeout: u64,
    /// Expert profile for the prompt context
    pub expert_profile: ExpertProfile,
    /// Per-request-type prompt overrides
    pub custom_prompts: CustomPrompts,
    /// Files per review batch
    pub max_files_per_batch: usize,
    /// Short-diff lines per review batch
    pub max_lines_per_batch: usize,
    /// Context lines for short diffs
    pub short_context: u32,
    /// Context lines for full diffs
    pub full_context: u32,
    /// Timeout for each `p4` call, seconds
    pub p4_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let widths = ContextWidths::default();
        Self {
            webhook_url: String::new(),
            timeout: 60,
            expert_profile: ExpertProfile::Generic,
            custom_prompts: CustomPrompts::default(),
            max_files_per_batch: DEFAULT_MAX_FILES,
            max_lines_per_batch: DEFAULT_MAX_LINES,
            short_context: widths.short,
            full_context: widths.full,
            p4_timeout: 60,
        }
    }
}

impl Settings {
    /// Read settings from `path`
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read settings, falling back to defaults when the file is missing or
    /// unreadable
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Whether a webhook URL is set
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.trim().is_empty()
    }

    /// Set one key from its string form
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnknownKey` for a key not in [`KEYS`] and
    /// `SettingsError::InvalidValue` when the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "webhook_url" => self.webhook_url = value.trim().to_string(),
            "timeout" => self.timeout = parse_positive(key, value)?,
            "expert_profile" => {
                self.expert_profile = value.parse().map_err(|reason| invalid(key, reason))?;
            }
            "custom_prompts.description" => self.custom_prompts.description = value.to_string(),
            "custom_prompts.review" => self.custom_prompts.review = value.to_string(),
            "max_files_per_batch" => self.max_files_per_batch = parse_positive(key, value)?,
            "max_lines_per_batch" => self.max_lines_per_batch = parse_positive(key, value)?,
            "short_context" => self.short_context = parse_number(key, value)?,
            "full_context" => self.full_context = parse_number(key, value)?,
            "p4_timeout" => self.p4_timeout = parse_positive(key, value)?,
            _ => {
                return Err(SettingsError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Webhook timeout
    #[must_use]
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// `p4` call timeout
    #[must_use]
    pub fn p4_timeout(&self) -> Duration {
        Duration::from_secs(self.p4_timeout)
    }

    /// Review batch limits
    #[must_use]
    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits {
            max_files: self.max_files_per_batch,
            max_lines: self.max_lines_per_batch,
        }
    }

    /// Diff context widths
    #[must_use]
    pub fn context_widths(&self) -> ContextWidths {
        ContextWidths {
            short: self.short_context,
            full: self.full_context,
        }
    }

    /// `expert_context` for a request: custom prompt if set, else the profile's
    #[must_use]
    pub fn expert_context(&self, request_type: RequestType) -> String {
        self.expert_profile
            .context(request_type, self.custom_prompts.get(request_type))
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, format!("{value:?}: {e}")))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, SettingsError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let parsed: T = parse_number(key, value)?;
    if parsed == T::default() {
        return Err(invalid(key, "must be greater than zero"));
    }
    Ok(parsed)
}
