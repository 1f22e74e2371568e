//! Report rendering
//!
//! A report is one self-contained block: a blank line, a header, one
//! `<word> - <count>` line per entry in snapshot order, then a separator.

use std::fmt::Write as _;
use std::io::{self, Write};

use thiserror::Error;

use crate::table::{FrequencyTable, Snapshot, TableError};

pub const REPORT_HEADER: &str = "Current word frequency count:";
pub const REPORT_SEPARATOR: &str = "-----------------------------";

/// Errors producing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Render a snapshot as a report block
pub fn render_report(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity(64 + snapshot.len() * 16);
    out.push('\n');
    out.push_str(REPORT_HEADER);
    out.push('\n');
    for (word, count) in snapshot.iter() {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{word} - {count}");
    }
    out.push_str(REPORT_SEPARATOR);
    out.push('\n');
    out
}

/// Snapshot `table` and append one report block to `sink`
///
/// The lock is released before any output. The block goes out in a single
/// write followed by a flush. Returns the number of entries reported.
pub fn write_report<W: Write>(sink: &mut W, table: &FrequencyTable) -> Result<usize, ReportError> {
    let snapshot = table.snapshot_sorted()?;
    let block = render_report(&snapshot);
    sink.write_all(block.as_bytes())?;
    sink.flush()?;
    Ok(snapshot.len())
}
