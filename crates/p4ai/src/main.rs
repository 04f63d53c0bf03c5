// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! p4ai: AI changelist descriptions and code review for Perforce
//!
//! Results are printed to stdout as JSON; logs and progress go to stderr.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use p4ai::config::{Command, Config, SettingsAction};
use p4ai::settings::Settings;
use p4ai::workflow::{Workflow, WorkflowOptions};
use p4ai::{DescriptionResult, ProgressEvent};
use p4ai_perforce::{CommandRunner, P4Client};
use p4ai_review::{BatchLimits, ReviewResult, WebhookClient};
use serde::Serialize;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command; `Ok(false)` means the command reported failure
async fn run(config: Config) -> Result<bool> {
    let Some(command) = config.command.clone() else {
        Config::command().print_help()?;
        return Ok(false);
    };

    let path = config.settings_path();
    let mut settings = Settings::load(&path);

    match command {
        Command::Settings { action } => settings_command(&action, &mut settings, &config),
        Command::Description {
            changelist,
            no_apply,
        } => {
            let result = match build_workflow(&config, &settings, None) {
                Ok(workflow) => workflow.generate_description(changelist, !no_apply).await,
                Err(err) => {
                    DescriptionResult::failure(err.kind(), format!("AI service error: {err}"))
                }
            };
            print_json(&result)?;
            Ok(result.success)
        }
        Command::Review {
            changelist,
            max_files,
            max_lines,
        } => {
            let limits = BatchLimits {
                max_files: max_files.unwrap_or(settings.max_files_per_batch).max(1),
                max_lines: max_lines.unwrap_or(settings.max_lines_per_batch).max(1),
            };
            let result = match build_workflow(&config, &settings, Some(limits)) {
                Ok(workflow) => workflow.review(changelist).await,
                Err(err) => {
                    ReviewResult::failure(err.kind(), format!("AI service error: {err}"))
                }
            };
            print_json(&result)?;
            Ok(result.success)
        }
    }
}

fn build_workflow(
    config: &Config,
    settings: &Settings,
    limits: Option<BatchLimits>,
) -> Result<Workflow<CommandRunner, WebhookClient>, p4ai_review::ServiceError> {
    let url = config
        .webhook_url
        .clone()
        .unwrap_or_else(|| settings.webhook_url.clone());
    let timeout = config
        .timeout_override()
        .unwrap_or_else(|| settings.webhook_timeout());
    let service = WebhookClient::new(url, timeout)?;

    let runner = CommandRunner::new(config.connection()).with_timeout(settings.p4_timeout());
    let mut options = WorkflowOptions::from(settings);
    if let Some(limits) = limits {
        options.limits = limits;
    }

    Ok(Workflow::new(P4Client::new(runner), service)
        .with_options(options)
        .with_progress(Box::new(|event: &ProgressEvent| match event {
            ProgressEvent::Warning { .. } => tracing::warn!("{event}"),
            _ => info!("{event}"),
        })))
}

fn settings_command(
    action: &SettingsAction,
    settings: &mut Settings,
    config: &Config,
) -> Result<bool> {
    let path = config.settings_path();
    match action {
        SettingsAction::Show => print_json(&*settings)?,
        SettingsAction::Path => println!("{}", path.display()),
        SettingsAction::Set { key, value } => {
            settings
                .set(key, value)
                .with_context(|| format!("Could not set {key}"))?;
            settings
                .save(&path)
                .with_context(|| format!("Could not write settings to {}", path.display()))?;
            info!(key = %key, path = %path.display(), "Settings saved");
        }
    }
    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
