//! Report matrix file parser.
//!
//! Reads a whitespace/tab-delimited binary matrix where each line is one
//! report. Cells must be 0 or 1; the aggregation core treats anything
//! else as "absent", so malformed values are rejected here at the
//! boundary instead.

use std::path::Path;

use anyhow::{bail, Context, Result};

use pvm_core::reports::ReportMatrix;

/// Parse a report matrix file.
///
/// # Arguments
/// - `path`: Path to the delimited text file
/// - `skip_header`: Whether the first line is a header to discard
pub fn parse_report_matrix(path: &Path, skip_header: bool) -> Result<ReportMatrix> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;

    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut lines = contents.lines().enumerate();
    if skip_header {
        lines.next();
    }

    for (line_num, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for field in line.split_whitespace() {
            match field {
                "0" => row.push(0),
                "1" => row.push(1),
                other => bail!(
                    "Line {}: expected 0 or 1, got '{}'",
                    line_num + 1,
                    other
                ),
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("Report file contains no data rows: {}", path.display());
    }

    ReportMatrix::from_rows(&rows).context("Report rows have inconsistent lengths")
}
