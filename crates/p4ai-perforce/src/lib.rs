// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! p4ai-perforce: Perforce changelist processing for p4ai
//!
//! This library crate turns `p4 describe` / `p4 diff` text output into a
//! structured [`ChangeRecord`] and collects per-file unified diffs for it.
//!
//! # Example
//!
//! ```no_run
//! use p4ai_perforce::{CommandRunner, DiffAcquirer, P4Client, P4Connection};
//!
//! # async fn run() -> Result<(), p4ai_perforce::P4Error> {
//! let client = P4Client::new(CommandRunner::new(P4Connection::default()));
//! let mut record = client.fetch_change(12345).await?;
//! let report = DiffAcquirer::new(&client).collect(&mut record).await;
//!
//! for file in &record.files {
//!     println!("{} {} ({} lines)", file.action, file.depot_path, file.line_count());
//! }
//! println!("{} files failed", report.failed.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod acquire;
pub mod change;
pub mod client;
pub mod error;
pub mod form;
pub mod parser;

pub use acquire::{AcquireReport, ContextWidths, DiffAcquirer};
pub use change::{ChangeRecord, ChangeStatus, DiffVariant, FileAction, FileChange};
pub use client::{CommandRunner, P4Client, P4Connection, P4Runner};
pub use error::P4Error;
pub use parser::{DiffDumpStats, parse_diff_dump, parse_summary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::acquire::{ContextWidths, DiffAcquirer};
    pub use crate::change::{ChangeRecord, ChangeStatus, DiffVariant, FileAction, FileChange};
    pub use crate::client::{P4Client, P4Runner};
    pub use crate::error::P4Error;
    pub use crate::parser::{parse_diff_dump, parse_summary};
}
