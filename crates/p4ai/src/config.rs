// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command-line configuration for p4ai
//!
//! Connection options mirror the `p4` environment variables so the tool can
//! be launched from a P4V custom-tool entry with `%p`-style arguments or from
//! a shell with `P4PORT` / `P4USER` / `P4CLIENT` already set.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use p4ai_perforce::P4Connection;

/// p4ai - AI changelist descriptions and code review for Perforce
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "p4ai")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the settings file
    ///
    /// Defaults to p4ai/config.json under the platform config directory.
    #[arg(long, env = "P4AI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Perforce server address
    #[arg(short, long, env = "P4PORT")]
    pub port: Option<String>,

    /// Perforce user
    #[arg(short, long, env = "P4USER")]
    pub user: Option<String>,

    /// Perforce client workspace
    #[arg(long, env = "P4CLIENT")]
    pub client: Option<String>,

    /// Webhook URL of the AI service (overrides the settings file)
    #[arg(long, env = "P4AI_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds (overrides the settings file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr; results go to stdout as JSON.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a description for a changelist
    ///
    /// By default the generated text replaces the changelist's description.
    #[command(alias = "desc")]
    Description {
        /// Changelist number
        #[arg(short, long)]
        changelist: u32,

        /// Print the description without writing it back
        #[arg(long)]
        no_apply: bool,
    },

    /// Review the code in a changelist
    Review {
        /// Changelist number
        #[arg(short, long)]
        changelist: u32,

        /// Maximum files per request batch
        #[arg(long)]
        max_files: Option<usize>,

        /// Maximum diff lines per request batch
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Show or change persisted settings
    Settings {
        /// Settings action
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// `settings` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,
    /// Set one key, e.g. `set webhook_url https://...`
    Set {
        /// Settings key (`custom_prompts.review` style for nested keys)
        key: String,
        /// New value
        value: String,
    },
    /// Print the settings file path
    Path,
}

impl Config {
    /// Get the settings file path, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/p4ai/config.json
    /// - Linux: ~/.config/p4ai/config.json
    /// - Windows: %APPDATA%\p4ai\config.json
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("p4ai")
                .join("config.json")
        })
    }

    /// Global `p4` options from the connection flags
    #[must_use]
    pub fn connection(&self) -> P4Connection {
        P4Connection {
            port: self.port.clone(),
            user: self.user.clone(),
            client: self.client.clone(),
        }
    }

    /// Webhook timeout override
    #[must_use]
    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}
