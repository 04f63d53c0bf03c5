// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! p4ai library
//!
//! This module exports the workflows behind the `p4ai` binary for use in
//! integration tests and by other hosts (for example a GUI front end that
//! supplies its own progress callback).
//!
//! # Example
//!
//! ```no_run
//! use p4ai::settings::Settings;
//! use p4ai::workflow::{Workflow, WorkflowOptions};
//! use p4ai_perforce::{CommandRunner, P4Client, P4Connection};
//! use p4ai_review::WebhookClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let client = P4Client::new(CommandRunner::new(P4Connection::default()));
//! let service = WebhookClient::new("http://localhost:5678/webhook/p4ai", settings.webhook_timeout())?;
//!
//! let workflow = Workflow::new(client, service)
//!     .with_options(WorkflowOptions::from(&settings))
//!     .with_progress(Box::new(|event| eprintln!("{event}")));
//! let result = workflow.review(12345).await;
//! println!("score {}", result.overall_score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod description;
pub mod error;
pub mod progress;
pub mod review;
pub mod settings;
pub mod workflow;

pub use description::DescriptionResult;
pub use error::WorkflowError;
pub use progress::{ProgressCallback, ProgressEvent};
pub use settings::Settings;
pub use workflow::{Workflow, WorkflowOptions};
