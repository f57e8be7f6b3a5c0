//! Table reference extraction from view query text

use crate::comments::strip_comments;
use crate::dialect::reference_pattern;
use bqva_core::{CoreResult, ObjectRef, ProjectId, QueryDialect};
use std::fmt;

/// A table or view named in a query, as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    /// `None` when the query omits the project
    pub project: Option<String>,
    pub dataset: String,
    pub table: String,
}

impl TableReference {
    pub fn new(project: Option<&str>, dataset: &str, table: &str) -> Self {
        Self {
            project: project.map(str::to_string),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }

    /// Resolve into a full identity, filling a missing project with
    /// `default_project`.
    pub fn qualify(&self, default_project: &ProjectId) -> CoreResult<ObjectRef> {
        let project = self
            .project
            .as_deref()
            .unwrap_or_else(|| default_project.as_str());
        ObjectRef::from_parts(project, &self.dataset, &self.table)
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project {
            Some(project) => write!(f, "{}:{}.{}", project, self.dataset, self.table),
            None => write!(f, "{}.{}", self.dataset, self.table),
        }
    }
}

/// Functions whose argument list uses `FROM` as a separator, as in
/// `EXTRACT(YEAR FROM o.created_at)`.
const FROM_ARGUMENT_FUNCTIONS: &[&str] = &["EXTRACT", "TRIM", "SUBSTRING"];

/// Whether the innermost unclosed `(` in `before` opens the argument list of
/// one of [`FROM_ARGUMENT_FUNCTIONS`].
fn inside_from_argument_call(before: &str) -> bool {
    let mut depth = 0usize;
    for (index, ch) in before.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' if depth > 0 => depth -= 1,
            '(' => {
                let callee = before[..index].trim_end();
                let start = callee
                    .char_indices()
                    .rev()
                    .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                    .map_or(0, |(i, c)| i + c.len_utf8());
                let name = &callee[start..];
                return FROM_ARGUMENT_FUNCTIONS
                    .iter()
                    .any(|function| function.eq_ignore_ascii_case(name));
            }
            _ => {}
        }
    }
    false
}

/// Extract every table reference from `sql`, in order of appearance.
///
/// Comments are stripped first so commented-out SQL contributes nothing.
/// A match immediately followed by `(` is a function call and is skipped, as
/// is a `FROM` separating the arguments of `EXTRACT`, `TRIM` or `SUBSTRING`.
/// Duplicates are kept: a table read twice yields two references.
pub fn extract_references(sql: &str, dialect: QueryDialect) -> Vec<TableReference> {
    let text = strip_comments(sql);
    let pattern = reference_pattern(dialect);

    pattern
        .captures_iter(&text)
        .filter(|caps| {
            let Some(whole) = caps.get(0) else {
                return false;
            };
            !text[whole.end()..].starts_with('(')
                && !inside_from_argument_call(&text[..whole.start()])
        })
        .filter_map(|caps| {
            Some(TableReference {
                project: caps.name("project").map(|m| m.as_str().to_string()),
                dataset: caps.name("dataset")?.as_str().to_string(),
                table: caps.name("table")?.as_str().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
