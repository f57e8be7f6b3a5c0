//! Project, dataset and object identities.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

define_identifier! {
    /// A warehouse project id (may contain hyphens), optionally scoped by a
    /// domain as in `example.com:my-project`.
    pub struct ProjectId("project", crate::newtype_string::validate_project);
}

define_identifier! {
    /// A dataset id, unique within its project.
    pub struct DatasetId("dataset");
}

define_identifier! {
    /// A table or view id, unique within its dataset.
    pub struct TableId("table");
}

/// A dataset addressed by `(project, dataset)`.
///
/// Datasets are the unit that owns an access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetRef {
    pub project: ProjectId,
    pub dataset: DatasetId,
}

impl DatasetRef {
    pub fn new(project: ProjectId, dataset: DatasetId) -> Self {
        Self { project, dataset }
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.dataset)
    }
}

/// The identity triple of a table or view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub project: ProjectId,
    pub dataset: DatasetId,
    pub table: TableId,
}

impl ObjectRef {
    pub fn new(project: ProjectId, dataset: DatasetId, table: TableId) -> Self {
        Self {
            project,
            dataset,
            table,
        }
    }

    /// Build a reference from raw string segments, validating each one.
    pub fn from_parts(project: &str, dataset: &str, table: &str) -> CoreResult<Self> {
        Ok(Self {
            project: ProjectId::new(project)?,
            dataset: DatasetId::new(dataset)?,
            table: TableId::new(table)?,
        })
    }

    /// Parse a `[PROJECT:]DATASET.NAME` identity. The project is everything
    /// before the last `:`, so domain-scoped projects parse too.
    ///
    /// When the project is omitted, `default_project` is used; if that is also
    /// absent the identity is rejected with [`CoreError::MissingProject`].
    pub fn parse(value: &str, default_project: Option<&ProjectId>) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidReference {
            value: value.to_string(),
        };

        let (project, rest) = match value.rsplit_once(':') {
            Some((project, rest)) => (Some(project), rest),
            None => (None, value),
        };
        let (dataset, table) = rest.split_once('.').ok_or_else(invalid)?;

        let malformed = |s: &str| s.is_empty() || s.contains([':', '.']);
        if project.is_some_and(str::is_empty) || malformed(dataset) || malformed(table) {
            return Err(invalid());
        }

        let project = match project {
            Some(p) => ProjectId::new(p)?,
            None => default_project
                .cloned()
                .ok_or_else(|| CoreError::MissingProject {
                    value: value.to_string(),
                })?,
        };

        Ok(Self {
            project,
            dataset: DatasetId::new(dataset)?,
            table: TableId::new(table)?,
        })
    }

    /// The dataset this object lives in.
    pub fn dataset_ref(&self) -> DatasetRef {
        DatasetRef {
            project: self.project.clone(),
            dataset: self.dataset.clone(),
        }
    }

    /// Whether both objects live in the same `(project, dataset)`.
    pub fn same_dataset(&self, other: &ObjectRef) -> bool {
        self.project == other.project && self.dataset == other.dataset
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.project, self.dataset, self.table)
    }
}

#[cfg(test)]
#[path = "identifier_test.rs"]
mod tests;
