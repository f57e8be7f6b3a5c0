//! bqva-sql - SQL reference extraction for bqva
//!
//! Recovers the tables and views a view's query reads from, lexically, under
//! either the standard or the legacy query dialect. Queries are never parsed
//! or validated; only identifiers following `FROM` / `JOIN` are extracted.

pub mod comments;
pub mod dialect;
pub mod extractor;

pub use comments::strip_comments;
pub use dialect::reference_pattern;
pub use extractor::{extract_references, TableReference};
