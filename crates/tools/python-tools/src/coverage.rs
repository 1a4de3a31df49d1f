//! Parsing of pytest-cov's terminal coverage table.
//!
//! ```text
//! Name                 Stmts   Miss  Cover
//! ----------------------------------------
//! snake/__init__.py        0      0   100%
//! snake/server.py         40      6    85%
//! ----------------------------------------
//! TOTAL                   40      6    85%
//! FAIL Required test coverage of 90% not reached. Total coverage: 85.00%
//! ```
//!
//! The branch (`Branch BrPart`) and `term-missing` (`Missing`) layouts are
//! read through the header's `Cover` column.

use crate::types::Coverage;

const FAILURE_PREFIX: &str = "FAIL Required test coverage";

/// Extract coverage figures from combined pytest output.
///
/// Output without a coverage table yields a zero total and no files.
pub fn parse_coverage(output: &str) -> Coverage {
    let mut coverage = Coverage::default();
    // Count of numeric columns between `Name` and `Cover` in the current table.
    let mut layout: Option<usize> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(FAILURE_PREFIX) {
            coverage.failure = Some(trimmed.to_string());
            continue;
        }
        let Some(numeric) = layout else {
            layout = header_layout(trimmed);
            continue;
        };
        if trimmed.starts_with("--") {
            continue;
        }
        if trimmed.is_empty() {
            layout = None;
            continue;
        }
        if let Some((name, percent)) = row(trimmed, numeric) {
            if name == "TOTAL" {
                coverage.total = percent;
            } else {
                coverage.by_file.insert(name, percent);
            }
        }
    }
    coverage
}

fn header_layout(line: &str) -> Option<usize> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.first() != Some(&"Name") || !cols.contains(&"Stmts") || !cols.contains(&"Miss") {
        return None;
    }
    let cover = cols.iter().position(|c| *c == "Cover")?;
    Some(cover - 1)
}

/// `name... <numeric cols> NN% [missing...]` → (name, NN). Names may contain
/// spaces; the percentage is the last token ending in `%`.
fn row(line: &str, numeric: usize) -> Option<(String, f64)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let at = parts.iter().rposition(|p| p.ends_with('%'))?;
    if at <= numeric {
        return None;
    }
    let percent = parts[at].strip_suffix('%')?.parse::<f64>().ok()?;
    Some((parts[..at - numeric].join(" "), percent))
}
