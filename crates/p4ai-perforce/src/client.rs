// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `p4` command-line client wrapper
//!
//! [`P4Client`] exposes the handful of `p4` subcommands the workflows need.
//! The actual process execution sits behind the [`P4Runner`] trait so tests
//! can script `p4` output without a Perforce server.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::change::ChangeRecord;
use crate::error::P4Error;
use crate::form::replace_description;
use crate::parser::{parse_summary, ztag_field};

/// Default timeout for a single `p4` invocation
pub const DEFAULT_P4_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings passed to every `p4` invocation as global options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct P4Connection {
    /// Server address (`-p`), e.g. `ssl:perforce:1666`
    pub port: Option<String>,
    /// User name (`-u`)
    pub user: Option<String>,
    /// Client workspace (`-c`)
    pub client: Option<String>,
}

impl P4Connection {
    /// Global options for this connection, in `p4` argument form
    #[must_use]
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (flag, value) in [("-p", &self.port), ("-u", &self.user), ("-c", &self.client)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                args.push(flag.to_string());
                args.push(value.to_string());
            }
        }
        args
    }
}

/// Executes `p4` with the given arguments and returns its stdout
#[async_trait]
pub trait P4Runner: Send + Sync {
    /// Run `p4 <args>`, optionally feeding `stdin`
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if `p4` cannot be run, times out, or exits non-zero
    /// with a message on stderr.
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<String, P4Error>;
}

/// Runs the real `p4` executable as a child process
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    connection: P4Connection,
    timeout: Duration,
}

impl CommandRunner {
    /// Create a runner for `p4` on PATH
    #[must_use]
    pub fn new(connection: P4Connection) -> Self {
        Self {
            program: "p4".to_string(),
            connection,
            timeout: DEFAULT_P4_TIMEOUT,
        }
    }

    /// Use a different executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl P4Runner for CommandRunner {
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<String, P4Error> {
        let command_line = args.join(" ");
        debug!(command = %command_line, "Running p4");

        let mut command = Command::new(&self.program);
        command
            .args(self.connection.global_args())
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => P4Error::NotInstalled {
                program: self.program.clone(),
            },
            _ => P4Error::Io(e),
        })?;

        let exchange = async move {
            if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(input.as_bytes()).await?;
            }
            child.wait_with_output().await
        };

        let output = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| P4Error::Timeout {
                command: command_line.clone(),
                secs: self.timeout.as_secs(),
            })??;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() && !stderr.is_empty() {
            return Err(P4Error::CommandFailed {
                command: command_line,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Typed access to the `p4` subcommands used by p4ai
pub struct P4Client<R = CommandRunner> {
    runner: R,
}

impl<R: P4Runner> P4Client<R> {
    /// Wrap a runner
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Borrow the underlying runner
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn run(&self, args: &[&str]) -> Result<String, P4Error> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        self.runner.run(&args, None).await
    }

    /// `p4 describe -s <change>`
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn describe_summary(&self, change: u32) -> Result<String, P4Error> {
        self.run(&["describe", "-s", &change.to_string()]).await
    }

    /// Fetch and parse the summary of a changelist
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if `p4 describe` fails.
    pub async fn fetch_change(&self, change: u32) -> Result<ChangeRecord, P4Error> {
        let text = self.describe_summary(change).await?;
        Ok(parse_summary(&text, change))
    }

    /// `p4 describe -du<context> <change>`
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn describe_diff(&self, change: u32, context: u32) -> Result<String, P4Error> {
        self.run(&["describe", &format!("-du{context}"), &change.to_string()])
            .await
    }

    /// `p4 diff -du<context> <depot_path>` for a file opened in the workspace
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn diff_file(&self, depot_path: &str, context: u32) -> Result<String, P4Error> {
        self.run(&["diff", &format!("-du{context}"), depot_path]).await
    }

    /// `p4 print -q <depot_path>@=<change>`: the shelved content of a file
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn print_shelved(&self, depot_path: &str, change: u32) -> Result<String, P4Error> {
        self.run(&["print", "-q", &format!("{depot_path}@={change}")])
            .await
    }

    /// Local filesystem path of a depot file (`p4 -ztag where`)
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Unmapped` if the path is not in the client view.
    pub async fn where_local(&self, depot_path: &str) -> Result<PathBuf, P4Error> {
        let output = self.run(&["-ztag", "where", depot_path]).await?;
        ztag_field(&output, "path")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| P4Error::Unmapped {
                depot_path: depot_path.to_string(),
            })
    }

    /// Revision synced in the workspace (`p4 -ztag have`), if any
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn have_revision(&self, depot_path: &str) -> Result<Option<u32>, P4Error> {
        let output = self.run(&["-ztag", "have", depot_path]).await?;
        Ok(ztag_field(&output, "haveRev").and_then(|rev| rev.parse().ok()))
    }

    /// `p4 change -o <change>`: the editable change form
    ///
    /// # Errors
    ///
    /// Returns `P4Error` if the command fails.
    pub async fn change_form(&self, change: u32) -> Result<String, P4Error> {
        self.run(&["change", "-o", &change.to_string()]).await
    }

    /// Replace a pending changelist's description
    ///
    /// # Errors
    ///
    /// Returns `P4Error::MalformedForm` if the change form has no description
    /// field, or `P4Error` if `p4 change -i` rejects the new form.
    pub async fn update_description(&self, change: u32, description: &str) -> Result<(), P4Error> {
        let form = self.change_form(change).await?;
        let form = replace_description(&form, description)
            .ok_or(P4Error::MalformedForm { number: change })?;
        let args = ["change".to_string(), "-i".to_string()];
        self.runner.run(&args, Some(&form)).await?;
        Ok(())
    }
}
