//! Comment removal ahead of reference matching.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Block comments (spanning newlines) or line comments, removed in one pass.
static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

fn comment_regex() -> &'static Regex {
    COMMENT_RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/|--[^\r\n]*").expect("valid regex literal"))
}

/// Remove `/* ... */` and `-- ...` comments from a query.
///
/// Each comment is replaced by a single space so tokens on either side stay
/// separated. Comment markers inside string literals are not special-cased.
pub fn strip_comments(sql: &str) -> Cow<'_, str> {
    comment_regex().replace_all(sql, " ")
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
