//! Catalog objects as returned by a metadata lookup.

use crate::identifier::ObjectRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query grammar a view was defined in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryDialect {
    /// Back-tick / dot references: `` `project.dataset.table` ``
    #[default]
    Standard,
    /// Bracket / colon references: `[project:dataset.table]`
    Legacy,
}

impl fmt::Display for QueryDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryDialect::Standard => write!(f, "standard"),
            QueryDialect::Legacy => write!(f, "legacy"),
        }
    }
}

/// What kind of object a reference resolved to.
///
/// Anything that is not a logical view (materialized views, external tables,
/// snapshots) is a `Table` and therefore a leaf of the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    View {
        query: String,
        #[serde(default)]
        dialect: QueryDialect,
    },
}

impl ObjectKind {
    /// Short label used in logs and rendering.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::View { .. } => "VIEW",
        }
    }
}

/// A resolved table or view. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogObject {
    reference: ObjectRef,
    kind: ObjectKind,
}

impl CatalogObject {
    pub fn new(reference: ObjectRef, kind: ObjectKind) -> Self {
        Self { reference, kind }
    }

    pub fn table(reference: ObjectRef) -> Self {
        Self::new(reference, ObjectKind::Table)
    }

    pub fn view(reference: ObjectRef, query: impl Into<String>, dialect: QueryDialect) -> Self {
        Self::new(
            reference,
            ObjectKind::View {
                query: query.into(),
                dialect,
            },
        )
    }

    pub fn reference(&self) -> &ObjectRef {
        &self.reference
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, ObjectKind::View { .. })
    }

    /// The defining query and its dialect, for views.
    pub fn view_definition(&self) -> Option<(&str, QueryDialect)> {
        match &self.kind {
            ObjectKind::View { query, dialect } => Some((query.as_str(), *dialect)),
            ObjectKind::Table => None,
        }
    }
}

impl fmt::Display for CatalogObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reference.fmt(f)
    }
}
