//! Dataset access-control entries.
//!
//! A dataset's access list is read and written as a whole. Only the
//! authorized-view entity is managed here; every other entry is carried
//! through verbatim so a read-modify-write never disturbs it.

use crate::identifier::ObjectRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The grantee of an access entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessEntity {
    /// An authorized view: the view itself may read the dataset.
    View(ObjectRef),
    /// Any other grantee (user, group, domain, special group, routine, ...).
    Member {
        entity_type: String,
        entity_id: Value,
    },
}

/// One entry of a dataset's access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub entity: AccessEntity,
    /// Attributes other than the role and grantee, such as an IAM
    /// `condition`, kept verbatim.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl AccessEntry {
    /// The entry granting `view` read access to the dataset holding the list.
    pub fn authorized_view(view: ObjectRef) -> Self {
        Self {
            role: None,
            entity: AccessEntity::View(view),
            extra: Map::new(),
        }
    }

    /// A role grant to some non-view member.
    pub fn member(
        role: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<Value>,
    ) -> Self {
        Self {
            role: Some(role.into()),
            entity: AccessEntity::Member {
                entity_type: entity_type.into(),
                entity_id: entity_id.into(),
            },
            extra: Map::new(),
        }
    }

    /// Whether this entry authorizes exactly `view` (identity and entity type).
    pub fn authorizes_view(&self, view: &ObjectRef) -> bool {
        matches!(&self.entity, AccessEntity::View(v) if v == view)
    }
}

impl fmt::Display for AccessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            AccessEntity::View(view) => write!(f, "view {}", view),
            AccessEntity::Member {
                entity_type,
                entity_id,
            } => {
                let id = match entity_id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                match &self.role {
                    Some(role) => write!(f, "{} {}={}", role, entity_type, id),
                    None => write!(f, "{}={}", entity_type, id),
                }
            }
        }
    }
}

/// Position of the first entry authorizing `view`, if any.
pub fn find_view_grant(entries: &[AccessEntry], view: &ObjectRef) -> Option<usize> {
    entries.iter().position(|e| e.authorizes_view(view))
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
