//! Per-dialect table reference patterns.
//!
//! Both patterns expose the same named groups (`project`, `dataset`,
//! `table`); `project` is optional in both.

use bqva_core::QueryDialect;
use regex::Regex;
use std::sync::OnceLock;

/// Standard dialect: each of project, dataset and table may be back-tick
/// quoted on its own or together; the project is separated by `.` or `:`.
const STANDARD_PATTERN: &str = r"(?im)\b(?:FROM|JOIN)\s+`?(?:(?P<project>\w[-\w]*)`?[:.])?`?(?P<dataset>\w+)`?\.`?(?P<table>\w+)`?";

/// Legacy dialect: `[project:dataset.table]` or `[dataset.table]`, where the
/// project may carry a domain prefix (`example.com:project`).
const LEGACY_PATTERN: &str = r"(?im)\b(?:FROM|JOIN)\s+\[(?:(?P<project>(?:[-\w.]+:)?[-\w]+):)?(?P<dataset>\w+)\.(?P<table>\w+)\]";

static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();

fn slot(dialect: QueryDialect) -> usize {
    match dialect {
        QueryDialect::Standard => 0,
        QueryDialect::Legacy => 1,
    }
}

/// The compiled reference pattern for `dialect`.
pub fn reference_pattern(dialect: QueryDialect) -> &'static Regex {
    let patterns = PATTERNS.get_or_init(|| {
        [
            Regex::new(STANDARD_PATTERN).expect("valid regex literal"),
            Regex::new(LEGACY_PATTERN).expect("valid regex literal"),
        ]
    });
    &patterns[slot(dialect)]
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
