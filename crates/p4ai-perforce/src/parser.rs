// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `p4 describe` / `p4 diff` text parsing
//!
//! The `p4` client has no stable structured output for describe, so this
//! module scans its text line by line with small explicit state machines:
//!
//! - [`parse_summary`] reads the header, description and file list of
//!   `p4 describe -s` into a [`ChangeRecord`].
//! - [`parse_diff_dump`] splits `p4 describe -du` output on its
//!   `==== path#rev ... ====` markers and stores each body on the matching
//!   file.
//!
//! # Example
//!
//! ```
//! use p4ai_perforce::parser::{parse_diff_dump, parse_summary};
//! use p4ai_perforce::DiffVariant;
//!
//! let describe = "Change 42 by alice@alice-ws on 2026/01/17 10:30:00 *pending*\n\
//!                 \n\
//!                 \tFix null check\n\
//!                 \n\
//!                 Affected files ...\n\
//!                 \n\
//!                 ... //depot/main/app.c#3 edit\n";
//! let mut record = parse_summary(describe, 42);
//! assert_eq!(record.user, "alice");
//! assert_eq!(record.files.len(), 1);
//!
//! let dump = "==== //depot/main/app.c#3 (text) ====\n@@ -1 +1 @@\n-a\n+b\n";
//! let stats = parse_diff_dump(dump, &mut record, DiffVariant::Short);
//! assert_eq!(stats.matched, 1);
//! assert_eq!(record.files[0].diff_short, "@@ -1 +1 @@\n-a\n+b");
//! ```

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, warn};

use crate::change::{ChangeRecord, DiffVariant, FileAction, FileChange};

/// `Change <n> by <user>@<client> on <date> [*<status>*]`
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Change (\d+) by ([^@\s]+)@(\S+) on (.+?)(?:\s+\*(\w+)\*)?\s*$")
        .expect("header regex is valid")
});

/// `... <depot_path>#<rev> <action>`
static FILE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.\.\. (.+)#(\d+) (\S+)").expect("file line regex is valid")
});

/// `==== <depot_path>#<rev> <rest> ====`
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^==== (.+)#(\d+)(.*?)\s*====\s*$").expect("marker regex is valid")
});

/// Date format used in describe headers
const HEADER_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// ============================================================================
// Summary parsing
// ============================================================================

/// Scanner position within `p4 describe -s` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryState {
    /// Before the description block; the header line lives here
    Preamble,
    /// Inside the description block
    Description,
    /// Inside a `Jobs fixed ...` block
    Jobs,
    /// Inside an `Affected files ...` / `Shelved files ...` block
    FileList,
    /// Diff output reached; nothing more to read
    Done,
}

/// Parse `p4 describe -s` output into a [`ChangeRecord`]
///
/// `requested` is used as the change number when no header line is found, so
/// a malformed header degrades to the caller's defaults instead of failing.
/// A record with no files is valid at this layer.
#[must_use]
pub fn parse_summary(text: &str, requested: u32) -> ChangeRecord {
    let mut record = ChangeRecord::new(requested);
    let mut description: Vec<&str> = Vec::new();
    let mut header_seen = false;
    let mut state = SummaryState::Preamble;

    for line in text.lines() {
        state = match state {
            SummaryState::Preamble => {
                if !header_seen && apply_header(line, &mut record) {
                    header_seen = true;
                    SummaryState::Preamble
                } else if opens_file_list(line) {
                    SummaryState::FileList
                } else if line.trim().is_empty() {
                    SummaryState::Description
                } else {
                    SummaryState::Preamble
                }
            }
            SummaryState::Description => {
                if line.starts_with("Affected files") || line.starts_with("Shelved files") {
                    SummaryState::FileList
                } else if line.starts_with("Jobs fixed") {
                    SummaryState::Jobs
                } else {
                    description.push(line.trim_start_matches([' ', '\t']));
                    SummaryState::Description
                }
            }
            SummaryState::Jobs => {
                if opens_file_list(line) {
                    SummaryState::FileList
                } else {
                    SummaryState::Jobs
                }
            }
            SummaryState::FileList => {
                if is_diff_section(line) {
                    SummaryState::Done
                } else {
                    if let Some(file) = parse_file_line(line) {
                        if !record.push_file(file) {
                            debug!(line = %line, "Skipping duplicate depot path in file list");
                        }
                    }
                    SummaryState::FileList
                }
            }
            SummaryState::Done => break,
        };
    }

    record.description = description.join("\n").trim().to_string();
    record
}

/// Fill header fields from a header line; returns `false` if it isn't one
fn apply_header(line: &str, record: &mut ChangeRecord) -> bool {
    let Some(caps) = HEADER_RE.captures(line) else {
        return false;
    };

    match caps[1].parse::<u32>() {
        Ok(number) if number > 0 => record.number = number,
        _ => debug!(line = %line, "Header change number unusable, keeping requested number"),
    }
    record.user = caps[2].to_string();
    record.client = caps[3].to_string();
    record.date = NaiveDateTime::parse_from_str(caps[4].trim(), HEADER_DATE_FORMAT).ok();
    if let Some(status) = caps.get(5) {
        match status.as_str().parse() {
            Ok(status) => record.status = status,
            Err(err) => debug!(error = %err, "Unrecognized status marker, keeping pending"),
        }
    }
    true
}

fn opens_file_list(line: &str) -> bool {
    line.contains("Affected files") || line.starts_with("Shelved files")
}

fn is_diff_section(line: &str) -> bool {
    line.starts_with("Differences ...") || MARKER_RE.is_match(line)
}

/// Parse one `... //depot/path#rev action` line
#[must_use]
pub fn parse_file_line(line: &str) -> Option<FileChange> {
    let caps = FILE_LINE_RE.captures(line)?;
    let revision = caps[2].parse().ok()?;
    Some(FileChange::new(
        &caps[1],
        revision,
        FileAction::from(&caps[3]),
    ))
}

// ============================================================================
// Diff dump parsing
// ============================================================================

/// A parsed `==== path#rev ... ====` marker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMarker<'a> {
    /// Depot path named by the marker
    pub depot_path: &'a str,
    /// Revision named by the marker
    pub revision: u32,
    /// File type when the marker ends with `(type)`
    pub file_type: Option<&'a str>,
}

/// Parse a diff marker line
#[must_use]
pub fn parse_marker(line: &str) -> Option<DiffMarker<'_>> {
    let caps = MARKER_RE.captures(line)?;
    let depot_path = caps.get(1)?.as_str();
    let revision = caps[2].parse().ok()?;
    let rest = caps.get(3).map_or("", |m| m.as_str().trim());
    let file_type = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .filter(|t| !t.is_empty());
    Some(DiffMarker {
        depot_path,
        revision,
        file_type,
    })
}

/// Outcome counts from [`parse_diff_dump`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffDumpStats {
    /// Bodies stored on a file of the record
    pub matched: usize,
    /// Bodies whose marker named a path not in the record
    pub unmatched: usize,
}

/// Scanner position within diff output
enum DumpState<'a> {
    /// No marker seen yet; header/file-list text is skipped
    Preamble,
    /// Accumulating the body that starts at `start` for `marker`
    Body { marker: DiffMarker<'a>, start: usize },
}

/// Split diff output on its markers and store each body on the record
///
/// Each body is stored in the `variant` field of the first file whose depot
/// path equals the marker's path. Bodies naming unknown paths are dropped and
/// counted in [`DiffDumpStats::unmatched`].
pub fn parse_diff_dump(
    text: &str,
    record: &mut ChangeRecord,
    variant: DiffVariant,
) -> DiffDumpStats {
    let mut stats = DiffDumpStats::default();
    for (marker, body) in split_bodies(text) {
        commit_body(record, &marker, body, variant, &mut stats);
    }
    if stats.unmatched > 0 {
        warn!(
            change = record.number,
            unmatched = stats.unmatched,
            "Dropped diff bodies for paths not in the file list"
        );
    }
    stats
}

/// Body of single-file `p4 diff` output, without its marker line
///
/// Output with no marker (for example a status message) is returned with its
/// trailing whitespace removed.
#[must_use]
pub fn extract_single_diff(text: &str) -> String {
    match split_bodies(text).into_iter().next() {
        Some((_, body)) => body.to_string(),
        None => text.trim_end().to_string(),
    }
}

/// Pair each marker with the verbatim text up to the next marker
fn split_bodies(text: &str) -> Vec<(DiffMarker<'_>, &str)> {
    let mut bodies = Vec::new();
    let mut state = DumpState::Preamble;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let Some(marker) = parse_marker(line.trim_end_matches(['\n', '\r'])) else {
            continue;
        };
        if let DumpState::Body { marker, start } = state {
            bodies.push((marker, strip_terminator(&text[start..line_start])));
        }
        state = DumpState::Body {
            marker,
            start: offset,
        };
    }

    if let DumpState::Body { marker, start } = state {
        bodies.push((marker, strip_terminator(&text[start..])));
    }
    bodies
}

fn strip_terminator(body: &str) -> &str {
    match body.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => body,
    }
}

fn commit_body(
    record: &mut ChangeRecord,
    marker: &DiffMarker<'_>,
    body: &str,
    variant: DiffVariant,
    stats: &mut DiffDumpStats,
) {
    let Some(index) = record.file_index(marker.depot_path) else {
        debug!(depot_path = marker.depot_path, "No file for diff marker");
        stats.unmatched += 1;
        return;
    };

    let file = &mut record.files[index];
    file.set_diff(variant, body.to_string());
    if file.file_type.is_empty() {
        if let Some(file_type) = marker.file_type {
            file.file_type = file_type.to_string();
        }
    }
    stats.matched += 1;
}

// ============================================================================
// Tagged output
// ============================================================================

/// Value of the first `... <name> <value>` line in `p4 -ztag` output
#[must_use]
pub fn ztag_field<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let rest = line.strip_prefix("... ")?.strip_prefix(name)?;
        let value = rest.strip_prefix(' ')?;
        Some(value.trim_end_matches('\r'))
    })
}
